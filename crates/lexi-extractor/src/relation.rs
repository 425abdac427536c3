//! Relationship inference module
//!
//! For every unordered concept pair, counts how often their mentions fall
//! close together and which cue words surround those co-occurrences, then
//! picks a single relationship type for the pair.

use lexi_core::{Concept, ConceptRelationship, ExtractorConfig, RelationshipType};

use crate::text::IndexedText;

// ============================================================================
// Cue Words
// ============================================================================

/// Words suggesting the earlier concept is needed for the later one
pub const PREREQUISITE_CUES: [&str; 6] = [
    "before",
    "first",
    "foundation",
    "builds on",
    "requires",
    "prerequisite",
];

/// Words suggesting the two concepts are being contrasted
pub const CONTRAST_CUES: [&str; 6] = [
    "unlike",
    "whereas",
    "in contrast",
    "however",
    "but",
    "different from",
];

/// Plain substring test against lowercase text
fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Phrasings that bind a general concept to one of its examples
#[derive(Debug, Clone)]
struct ExampleTemplates {
    phrases: [String; 5],
}

impl ExampleTemplates {
    /// `general` is the first concept of the pair, `specific` the second
    fn new(general: &str, specific: &str) -> Self {
        let a = general.to_lowercase();
        let b = specific.to_lowercase();
        Self {
            phrases: [
                format!("{a} such as {b}"),
                format!("{a} (e.g., {b}"),
                format!("{b} is an example of {a}"),
                format!("{b} exemplifies {a}"),
                format!("{a} like {b}"),
            ],
        }
    }

    fn matches(&self, context: &str) -> bool {
        self.phrases.iter().any(|p| context.contains(p.as_str()))
    }
}

// ============================================================================
// Pair Signals
// ============================================================================

/// Counts gathered over all mention pairs of one concept pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairSignals {
    pub cooccurrences: usize,
    pub prerequisite: usize,
    pub contrast: usize,
    pub example: usize,
}

// ============================================================================
// Inferencer
// ============================================================================

/// Heuristic relationship classifier
#[derive(Debug, Clone)]
pub struct RelationshipInferencer {
    proximity_threshold: usize,
    context_window: usize,
    min_signal_count: usize,
    related_strength_divisor: f32,
    signal_strength_divisor: f32,
}

impl RelationshipInferencer {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            proximity_threshold: config.proximity_threshold,
            context_window: config.context_window,
            min_signal_count: config.min_signal_count,
            related_strength_divisor: config.related_strength_divisor,
            signal_strength_divisor: config.signal_strength_divisor,
        }
    }

    /// At most one relationship per unordered pair, in pair-visit order
    pub fn infer(&self, text: &IndexedText<'_>, concepts: &[Concept]) -> Vec<ConceptRelationship> {
        let mut relationships = Vec::new();

        for (i, a) in concepts.iter().enumerate() {
            for b in &concepts[i + 1..] {
                let signals = self.scan_pair(text, a, b);
                if let Some(relationship) = self.classify(a, b, &signals) {
                    relationships.push(relationship);
                }
            }
        }

        tracing::debug!(
            "Inferred {} relationships across {} concepts",
            relationships.len(),
            concepts.len()
        );
        relationships
    }

    /// Walk the mention cross product of `a` and `b`; offsets are characters
    pub fn scan_pair(&self, text: &IndexedText<'_>, a: &Concept, b: &Concept) -> PairSignals {
        let templates = ExampleTemplates::new(&a.name, &b.name);
        let mut signals = PairSignals::default();

        for ma in &a.mentions {
            for mb in &b.mentions {
                if ma.offset.abs_diff(mb.offset) >= self.proximity_threshold {
                    continue;
                }
                signals.cooccurrences += 1;

                let earlier = ma.offset.min(mb.offset);
                let later = ma.offset.max(mb.offset);
                let start = earlier.saturating_sub(self.context_window);
                let end = later.saturating_add(self.context_window);
                let context = text.slice(start, end).to_lowercase();

                if ma.offset < mb.offset && contains_any(&context, &PREREQUISITE_CUES) {
                    signals.prerequisite += 1;
                }
                if contains_any(&context, &CONTRAST_CUES) {
                    signals.contrast += 1;
                }
                if templates.matches(&context) {
                    signals.example += 1;
                }
            }
        }

        signals
    }

    /// Priority: prerequisite > contrast > example > related
    pub fn classify(
        &self,
        a: &Concept,
        b: &Concept,
        signals: &PairSignals,
    ) -> Option<ConceptRelationship> {
        if signals.cooccurrences == 0 {
            return None;
        }

        let related_strength = signals.cooccurrences as f32 / self.related_strength_divisor;
        let signal_strength = |count: usize| count as f32 / self.signal_strength_divisor;

        let relationship = if signals.prerequisite >= self.min_signal_count {
            ConceptRelationship::new(
                &a.id,
                &b.id,
                RelationshipType::Prerequisite,
                signal_strength(signals.prerequisite),
            )
        } else if signals.contrast >= self.min_signal_count {
            ConceptRelationship::new(
                &a.id,
                &b.id,
                RelationshipType::Contrasts,
                signal_strength(signals.contrast),
            )
        } else if signals.example >= self.min_signal_count {
            // The exemplifying concept becomes the source
            ConceptRelationship::new(&b.id, &a.id, RelationshipType::Example, related_strength)
        } else {
            ConceptRelationship::new(&a.id, &b.id, RelationshipType::Related, related_strength)
        };

        Some(relationship)
    }
}

impl Default for RelationshipInferencer {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
