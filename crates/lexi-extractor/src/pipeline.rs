//! Pipeline orchestrator
//!
//! Resolves the run dictionary and drives the phases in order:
//! match, filter, relate, prerequisites, hierarchy, sequence.

use std::collections::HashSet;

use lexi_core::{
    assign_ids, unique_id, ConceptDefinition, ConceptGraph, DictionaryProvider, ExtractionPhase,
    ExtractorConfig, LexiError, NoProgress, ProgressSink, Result,
};

use crate::hierarchy::{build_hierarchy, build_sequence, populate_prerequisites};
use crate::matcher::{PatternCache, TermMatcher};
use crate::mention::MentionFilter;
use crate::relation::RelationshipInferencer;
use crate::text::IndexedText;

/// Id namespace for caller-supplied concepts
pub const CUSTOM_DOMAIN: &str = "custom";

/// Reject chapter payloads that are not UTF-8 text
pub fn validate_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| {
        LexiError::InvalidInput(format!(
            "chapter text is not valid UTF-8 (invalid byte at {})",
            e.valid_up_to()
        ))
    })
}

// ============================================================================
// Request
// ============================================================================

/// Inputs of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionRequest<'a> {
    pub text: &'a str,
    pub domain: &'a str,
    pub include_cross_domain: bool,
    pub custom_concepts: Vec<ConceptDefinition>,
}

impl<'a> ExtractionRequest<'a> {
    pub fn new(text: &'a str, domain: &'a str) -> Self {
        Self {
            text,
            domain,
            include_cross_domain: false,
            custom_concepts: Vec::new(),
        }
    }

    pub fn with_cross_domain(mut self, include: bool) -> Self {
        self.include_cross_domain = include;
        self
    }

    pub fn with_custom_concepts(mut self, concepts: Vec<ConceptDefinition>) -> Self {
        self.custom_concepts = concepts;
        self
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Concept extraction pipeline over a dictionary provider
pub struct ConceptPipeline<P> {
    provider: P,
    config: ExtractorConfig,
    filter: MentionFilter,
    inferencer: RelationshipInferencer,
    /// Term patterns compiled by earlier runs
    patterns: PatternCache,
}

impl<P: DictionaryProvider> ConceptPipeline<P> {
    /// Pipeline with the default extractor settings
    pub fn new(provider: P) -> Self {
        let config = ExtractorConfig::default();
        Self {
            filter: MentionFilter::new(&config),
            inferencer: RelationshipInferencer::new(&config),
            patterns: PatternCache::new(),
            provider,
            config,
        }
    }

    /// Pipeline with custom settings, validated up front
    pub fn with_config(provider: P, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: MentionFilter::new(&config),
            inferencer: RelationshipInferencer::new(&config),
            patterns: PatternCache::new(),
            provider,
            config,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Matcher over `definitions`, compiling only terms no earlier run used
    pub fn term_matcher<'d>(&self, definitions: &'d [ConceptDefinition]) -> TermMatcher<'d> {
        TermMatcher::with_cache(definitions, &self.patterns)
    }

    /// Number of distinct term patterns compiled so far
    pub fn cached_pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Domain concepts, then cross-domain (if requested), then custom.
    ///
    /// Every returned definition carries an id that is unique within the
    /// list. An unknown domain contributes nothing. The request is only
    /// borrowed: custom concepts are copied into the returned list and the
    /// request's own definitions keep their ids (or lack of them).
    pub fn resolve_dictionary(&self, request: &ExtractionRequest<'_>) -> Vec<ConceptDefinition> {
        let mut definitions = match self.provider.dictionary_for_domain(request.domain) {
            Some(dictionary) => {
                tracing::debug!(
                    "Using {} dictionary {} v{} ({} concepts)",
                    self.provider.name(),
                    dictionary.domain_name,
                    dictionary.version,
                    dictionary.len()
                );
                dictionary.concepts
            }
            None => {
                tracing::debug!(
                    "No {} dictionary for domain {:?}",
                    self.provider.name(),
                    request.domain
                );
                Vec::new()
            }
        };

        if request.include_cross_domain {
            definitions.extend(self.provider.cross_domain_concepts());
        }
        definitions.extend(assign_ids(CUSTOM_DOMAIN, request.custom_concepts.clone()));

        let mut taken = HashSet::with_capacity(definitions.len());
        for definition in &mut definitions {
            let key = definition.key().to_string();
            let id = unique_id(&key, &mut taken);
            if id != key {
                tracing::warn!("Duplicate concept id {}, renamed to {}", key, id);
            }
            definition.id = Some(id);
        }

        definitions
    }

    /// Run extraction without progress reporting
    pub fn extract(&self, request: &ExtractionRequest<'_>) -> ConceptGraph {
        self.extract_with_progress(request, &NoProgress)
    }

    /// Run extraction, notifying `progress` as each phase starts
    pub fn extract_with_progress(
        &self,
        request: &ExtractionRequest<'_>,
        progress: &dyn ProgressSink,
    ) -> ConceptGraph {
        let text = IndexedText::new(request.text);
        let definitions = self.resolve_dictionary(request);

        progress.on_progress(
            ExtractionPhase::Matching,
            &format!("Scanning for {} dictionary concepts", definitions.len()),
        );
        let matcher = self.term_matcher(&definitions);
        let found = matcher.find(&text);
        tracing::debug!(
            "Matching: {} terms, {} concepts found",
            matcher.pattern_count(),
            found.len()
        );

        progress.on_progress(
            ExtractionPhase::Filtering,
            &format!("Filtering mentions of {} concepts", found.len()),
        );
        let mut concepts = self.filter.filter(&text, &found);

        progress.on_progress(
            ExtractionPhase::Relating,
            &format!("Inferring relationships among {} concepts", concepts.len()),
        );
        let relationships = self.inferencer.infer(&text, &concepts);

        progress.on_progress(
            ExtractionPhase::Prerequisites,
            &format!("Linking prerequisites from {} relationships", relationships.len()),
        );
        populate_prerequisites(&mut concepts, &relationships);

        progress.on_progress(ExtractionPhase::Hierarchy, "Grouping concepts by importance");
        let hierarchy = build_hierarchy(&concepts);

        progress.on_progress(ExtractionPhase::Sequencing, "Ordering concepts by first mention");
        let sequence = build_sequence(&concepts);

        tracing::info!(
            "Extracted {} concepts and {} relationships (domain: {})",
            concepts.len(),
            relationships.len(),
            request.domain
        );
        progress.on_progress(
            ExtractionPhase::Complete,
            &format!("Found {} concepts", concepts.len()),
        );

        ConceptGraph {
            concepts,
            relationships,
            hierarchy,
            sequence,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
