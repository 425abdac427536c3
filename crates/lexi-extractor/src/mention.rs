//! Mention filtering module
//!
//! Turns raw occurrences into confirmed mentions with a context snippet,
//! dropping hits that look like table-of-contents lines. Concepts whose
//! every hit is noise never reach the output, and ids are handed out in
//! the order concepts survive.

use lexi_core::{Concept, ConceptMention, ExtractorConfig};

use crate::matcher::{FoundConcept, Occurrence};
use crate::text::{IndexedText, Window};

/// Marker added where a context window was cut short
pub const ELLIPSIS: &str = "...";

/// Builds the concept list from matcher output
#[derive(Debug, Clone)]
pub struct MentionFilter {
    context_window: usize,
    toc_max_window_len: usize,
    dot_leader: String,
}

impl MentionFilter {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            context_window: config.context_window,
            toc_max_window_len: config.toc_max_window_len,
            dot_leader: ".".repeat(config.dot_leader_run),
        }
    }

    /// Confirm mentions and assign `concept-<n>` ids in input order
    pub fn filter(&self, text: &IndexedText<'_>, found: &[FoundConcept<'_>]) -> Vec<Concept> {
        let mut concepts: Vec<Concept> = Vec::with_capacity(found.len());
        let mut noise = 0usize;

        for candidate in found {
            let mentions: Vec<ConceptMention> = candidate
                .occurrences
                .iter()
                .filter_map(|occurrence| self.mention_at(text, occurrence))
                .collect();
            noise += candidate.count() - mentions.len();

            let Some(first) = mentions.first() else {
                tracing::debug!("Dropping {}: every occurrence is noise", candidate.definition.name);
                continue;
            };

            let definition = candidate.definition;
            concepts.push(Concept {
                id: format!("concept-{}", concepts.len() + 1),
                name: definition.name.clone(),
                definition: definition.resolved_definition(),
                importance: definition.importance.unwrap_or_default(),
                first_mention: first.offset,
                related_concepts: definition.related.clone(),
                prerequisites: Vec::new(),
                mentions,
            });
        }

        tracing::debug!(
            "Kept {} concepts, filtered {} noisy occurrences",
            concepts.len(),
            noise
        );
        concepts
    }

    /// Mention for one occurrence, or `None` when its window is noise
    pub fn mention_at(
        &self,
        text: &IndexedText<'_>,
        occurrence: &Occurrence,
    ) -> Option<ConceptMention> {
        let window = Window::around(
            text,
            occurrence.offset,
            occurrence.end(),
            self.context_window,
        );
        let raw = window.slice(text);

        if self.is_toc_noise(raw.trim()) {
            return None;
        }

        let mut context = String::with_capacity(raw.len() + 2 * ELLIPSIS.len());
        if window.truncated_start {
            context.push_str(ELLIPSIS);
        }
        context.push_str(raw);
        if window.truncated_end {
            context.push_str(ELLIPSIS);
        }

        Some(ConceptMention::new(
            occurrence.offset,
            context.trim().to_string(),
        ))
    }

    /// Trailing page number, or a short window with a dot leader
    pub fn is_toc_noise(&self, window: &str) -> bool {
        let ends_in_number = window.ends_with(|c: char| c.is_ascii_digit());
        let dot_leader = window.chars().count() <= self.toc_max_window_len
            && window.contains(self.dot_leader.as_str());
        ends_in_number || dot_leader
    }
}

impl Default for MentionFilter {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::{ConceptDefinition, Importance};

    fn found<'d>(definition: &'d ConceptDefinition, hits: &[(usize, usize)]) -> FoundConcept<'d> {
        FoundConcept {
            definition,
            occurrences: hits
                .iter()
                .map(|&(offset, len)| Occurrence { offset, len })
                .collect(),
        }
    }

    #[test]
    fn test_noise_trailing_number() {
        let filter = MentionFilter::default();
        assert!(filter.is_toc_noise("Introduction to loops 45"));
        assert!(filter.is_toc_noise("see page 7"));
        assert!(!filter.is_toc_noise("There are 7 loops here."));
    }

    #[test]
    fn test_noise_dot_leader_short_window_only() {
        let filter = MentionFilter::default();
        assert!(filter.is_toc_noise("Loops ........ intro"));
        assert!(!filter.is_toc_noise("Loops ....... intro"));

        let long = format!("Loops ........ {}", "x".repeat(40));
        assert!(!filter.is_toc_noise(&long));
    }

    #[test]
    fn test_context_ellipsis_markers() {
        let config = ExtractorConfig {
            context_window: 5,
            ..Default::default()
        };
        let filter = MentionFilter::new(&config);
        let text = "The quick loop runs forever and ever.";
        let offset = text.find("loop").unwrap();

        let mention = filter
            .mention_at(&IndexedText::new(text), &Occurrence { offset, len: 4 })
            .unwrap();
        assert_eq!(mention.context, "...uick loop runs...");
        assert_eq!(mention.offset, offset);
        assert!(!mention.is_revisit);
        assert!(mention.associated_concepts.is_empty());
    }

    #[test]
    fn test_whole_text_window_has_no_markers() {
        let filter = MentionFilter::default();
        let text = "  A loop repeats.  ";
        let offset = text.find("loop").unwrap();
        let mention = filter
            .mention_at(&IndexedText::new(text), &Occurrence { offset, len: 4 })
            .unwrap();
        assert_eq!(mention.context, "A loop repeats.");
    }

    #[test]
    fn test_window_radius_counts_characters() {
        let config = ExtractorConfig {
            context_window: 4,
            ..Default::default()
        };
        let filter = MentionFilter::new(&config);
        let text = IndexedText::new("ééééé—loop—ééééé");

        let mention = filter
            .mention_at(&text, &Occurrence { offset: 6, len: 4 })
            .unwrap();
        assert_eq!(mention.context, "...ééé—loop—ééé...");
        assert_eq!(mention.offset, 6);
    }

    #[test]
    fn test_ids_follow_survival_order() {
        let noisy = ConceptDefinition::new("index", "toc").with_id("a");
        let loop_def = ConceptDefinition::new("loop", "control flow")
            .with_id("b")
            .with_importance(Importance::Core);
        let array = ConceptDefinition::new("array", "data structures").with_id("c");

        let body = "A loop walks an array.";
        let toc = "index ........ 3";
        let combined = format!("{body}\n{}\n{toc}", "-".repeat(120));
        let toc_start = combined.find(toc).unwrap();

        let candidates = vec![
            found(&noisy, &[(toc_start, 5)]),
            found(&loop_def, &[(2, 4)]),
            found(&array, &[(16, 5)]),
        ];

        let concepts = MentionFilter::default().filter(&IndexedText::new(&combined), &candidates);
        let names: Vec<&str> = concepts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["loop", "array"]);
        assert_eq!(concepts[0].id, "concept-1");
        assert_eq!(concepts[1].id, "concept-2");
        assert_eq!(concepts[0].importance, Importance::Core);
        assert_eq!(concepts[1].importance, Importance::Supporting);
        assert_eq!(concepts[1].definition, "data structures");
    }
}
