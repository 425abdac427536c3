//! Term matching module
//!
//! Scans chapter text for every dictionary term (canonical name and each
//! alias) with a case-insensitive, whole-word pattern. Hits from all terms
//! of one definition land in the same bucket, keyed by the definition's id.
//! Compiled patterns live in a [`PatternCache`] so a long-lived pipeline
//! compiles each term once.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use regex::Regex;

use lexi_core::ConceptDefinition;

use crate::text::IndexedText;

/// One raw hit of a term in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Character offset of the match start
    pub offset: usize,
    /// Length of the matched text in characters
    pub len: usize,
}

impl Occurrence {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A definition with every place it occurs, before noise filtering
#[derive(Debug, Clone)]
pub struct FoundConcept<'d> {
    pub definition: &'d ConceptDefinition,
    /// Sorted by offset ascending
    pub occurrences: Vec<Occurrence>,
}

impl FoundConcept<'_> {
    /// Raw occurrence count (overlapping alias hits included)
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }
}

// ============================================================================
// Pattern Cache
// ============================================================================

/// Compiled term patterns keyed by pattern source
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached regex for `source`, compiled on first use
    pub fn get_or_compile(&self, source: &str) -> Result<Arc<Regex>, regex::Error> {
        let cached = self.read().get(source).cloned();
        if let Some(regex) = cached {
            return Ok(regex);
        }

        let regex = Arc::new(Regex::new(source)?);
        Ok(Arc::clone(
            self.write().entry(source.to_string()).or_insert(regex),
        ))
    }

    /// Number of compiled patterns held
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Regex>>> {
        self.compiled.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Regex>>> {
        self.compiled.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Compiled search pattern for one term
#[derive(Debug)]
struct TermPattern {
    /// Index into the matcher's definition list
    definition: usize,
    regex: Arc<Regex>,
}

/// Whole-word, case-insensitive dictionary matcher
pub struct TermMatcher<'d> {
    definitions: &'d [ConceptDefinition],
    patterns: Vec<TermPattern>,
}

impl<'d> TermMatcher<'d> {
    /// Compile one pattern per term of every definition
    pub fn new(definitions: &'d [ConceptDefinition]) -> Self {
        Self::with_cache(definitions, &PatternCache::new())
    }

    /// Like [`TermMatcher::new`], reusing patterns already in `cache`
    pub fn with_cache(definitions: &'d [ConceptDefinition], cache: &PatternCache) -> Self {
        let mut patterns = Vec::new();

        for (index, definition) in definitions.iter().enumerate() {
            for term in definition.terms() {
                let Some(source) = term_pattern(term) else {
                    continue;
                };
                match cache.get_or_compile(&source) {
                    Ok(regex) => patterns.push(TermPattern {
                        definition: index,
                        regex,
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping term {:?} of {}: {}", term, definition.name, e);
                    }
                }
            }
        }

        Self {
            definitions,
            patterns,
        }
    }

    /// Number of compiled term patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Find every definition that occurs in `text`.
    ///
    /// Each pattern scans independently, so a name and an alias that match
    /// overlapping spans both count. The result is ordered by descending
    /// occurrence count; ties keep dictionary order.
    pub fn find(&self, text: &IndexedText<'_>) -> Vec<FoundConcept<'d>> {
        let buckets = self.patterns.iter().fold(
            HashMap::<&str, Vec<Occurrence>>::new(),
            |mut acc, pattern| {
                let key = self.definitions[pattern.definition].key();
                let hits = pattern.regex.find_iter(text.as_str()).map(|m| {
                    let offset = text.char_at(m.start());
                    Occurrence {
                        offset,
                        len: text.char_at(m.end()) - offset,
                    }
                });
                acc.entry(key).or_default().extend(hits);
                acc
            },
        );

        let mut found: Vec<FoundConcept<'d>> = self
            .definitions
            .iter()
            .filter_map(|definition| {
                let mut occurrences = buckets.get(definition.key())?.clone();
                if occurrences.is_empty() {
                    return None;
                }
                occurrences.sort_by_key(|o| o.offset);
                Some(FoundConcept {
                    definition,
                    occurrences,
                })
            })
            .collect();

        // Stable: equal counts keep dictionary order
        found.sort_by(|a, b| b.count().cmp(&a.count()));

        tracing::debug!(
            "Matched {} of {} definitions ({} patterns)",
            found.len(),
            self.definitions.len(),
            self.patterns.len()
        );
        found
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Regex source for a term, or `None` for a blank term.
///
/// Word boundaries are only asserted on edges that are word characters, so
/// terms such as `C++` still match before whitespace.
fn term_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let lead = if term.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if term.ends_with(is_word_char) { r"\b" } else { "" };
    Some(format!("(?i){}{}{}", lead, regex::escape(term), trail))
}

// ============================================================================
// Tests
// ============================================================================
