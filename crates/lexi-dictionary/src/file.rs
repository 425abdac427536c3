//! File-backed dictionary provider
//!
//! Loads every `*.json` and `*.toml` file in a directory as a
//! [`ConceptDictionary`]. A file whose `domainName` is `cross-domain`
//! supplies the cross-domain concept list instead of a domain.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use lexi_core::{
    assign_ids, ConceptDefinition, ConceptDictionary, DictionaryProvider, LexiError, Result,
};

use crate::{domain_key, CROSS_DOMAIN};

/// On-disk dictionary layout (ids optional; assigned on load)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DictionaryFile {
    domain_name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    concepts: Vec<ConceptDefinition>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Provider over dictionaries loaded once from disk
#[derive(Debug, Clone, Default)]
pub struct FileDictionaryProvider {
    dictionaries: BTreeMap<String, ConceptDictionary>,
    cross_domain: Vec<ConceptDefinition>,
}

impl FileDictionaryProvider {
    /// Load all dictionaries in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| matches!(extension(p).as_deref(), Some("json") | Some("toml")))
            .collect();
        paths.sort();

        let mut provider = Self::default();
        for path in paths {
            let dictionary = load_file(&path)?;
            provider.insert(dictionary);
        }

        tracing::debug!(
            "Loaded {} dictionaries ({} cross-domain concepts) from {}",
            provider.dictionaries.len(),
            provider.cross_domain.len(),
            dir.display()
        );
        Ok(provider)
    }

    /// Register a dictionary, replacing any with the same domain
    pub fn insert(&mut self, dictionary: ConceptDictionary) {
        let key = domain_key(&dictionary.domain_name);
        if key == CROSS_DOMAIN {
            self.cross_domain.extend(dictionary.concepts);
            return;
        }
        if self.dictionaries.insert(key.clone(), dictionary).is_some() {
            tracing::warn!("Duplicate dictionary for domain {}, keeping the later file", key);
        }
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

impl DictionaryProvider for FileDictionaryProvider {
    fn dictionary_for_domain(&self, domain: &str) -> Option<ConceptDictionary> {
        self.dictionaries.get(&domain_key(domain)).cloned()
    }

    fn cross_domain_concepts(&self) -> Vec<ConceptDefinition> {
        self.cross_domain.clone()
    }

    fn domains(&self) -> Vec<String> {
        self.dictionaries
            .values()
            .map(|d| d.domain_name.clone())
            .collect()
    }

    fn name(&self) -> &str {
        "file"
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Parse one dictionary file
pub fn load_file(path: &Path) -> Result<ConceptDictionary> {
    let content = std::fs::read_to_string(path)?;

    let file: DictionaryFile = match extension(path).as_deref() {
        Some("toml") => toml::from_str(&content)
            .map_err(|e| LexiError::Dictionary(format!("{}: {}", path.display(), e)))?,
        _ => serde_json::from_str(&content)
            .map_err(|e| LexiError::Dictionary(format!("{}: {}", path.display(), e)))?,
    };

    if file.domain_name.trim().is_empty() {
        return Err(LexiError::Dictionary(format!(
            "{}: domainName must not be empty",
            path.display()
        )));
    }

    let concepts = assign_ids(&file.domain_name, file.concepts);
    Ok(ConceptDictionary {
        domain_name: file.domain_name,
        version: file.version,
        concepts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::Importance;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "physics.json",
            r#"{
                "domainName": "Physics",
                "version": "2.0.0",
                "concepts": [
                    {"name": "force", "aliases": ["forces"], "category": "mechanics", "importance": "core"},
                    {"name": "mass", "category": "mechanics"}
                ]
            }"#,
        );
        write(
            dir.path(),
            "cross.toml",
            r#"
domainName = "cross-domain"

[[concepts]]
name = "model"
category = "scientific method"
"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let provider = FileDictionaryProvider::from_dir(dir.path()).unwrap();
        assert_eq!(provider.domains(), vec!["Physics"]);

        let physics = provider.dictionary_for_domain("physics").unwrap();
        assert_eq!(physics.version, "2.0.0");
        assert_eq!(physics.concepts[0].id.as_deref(), Some("physics-force"));
        assert_eq!(physics.concepts[0].importance, Some(Importance::Core));
        assert_eq!(physics.concepts[1].importance, None);

        let cross = provider.cross_domain_concepts();
        assert_eq!(cross.len(), 1);
        assert_eq!(cross[0].id.as_deref(), Some("cross-domain-model"));
    }

    #[test]
    fn test_malformed_file_is_dictionary_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.json", "{ not json");

        let result = FileDictionaryProvider::from_dir(dir.path());
        assert!(matches!(result, Err(LexiError::Dictionary(_))));
    }

    #[test]
    fn test_unknown_domain_is_none() {
        let provider = FileDictionaryProvider::default();
        assert!(provider.dictionary_for_domain("computing").is_none());
        assert!(provider.is_empty());
    }
}
