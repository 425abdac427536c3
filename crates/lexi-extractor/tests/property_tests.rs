//! Property-based tests for the extraction pipeline
//!
//! Generates chapter-like text from a vocabulary of dictionary terms, cue
//! words, and table-of-contents debris, then checks the graph invariants
//! hold for every input.

use std::collections::HashSet;

use lexi_core::ConceptGraph;
use lexi_dictionary::BuiltinDictionaries;
use lexi_extractor::{ConceptPipeline, ExtractionRequest, IndexedText};
use once_cell::sync::Lazy;
use proptest::prelude::*;

/// Shared so generated cases reuse compiled term patterns
static PIPELINE: Lazy<ConceptPipeline<BuiltinDictionaries>> =
    Lazy::new(|| ConceptPipeline::new(BuiltinDictionaries::new()));

const WORDS: &[&str] = &[
    "loop", "loops", "Loop", "function", "functions", "function call", "variable", "array",
    "recursion", "class", "classroom", "object", "hypothesis", "model", "such as", "like",
    "unlike", "however", "but", "before", "requires", "first", "is an example of", "the", "a",
    "and", ".", ",", "........", "42", "7", "\n", "naïve", "→", "(e.g.,", "",
];

/// Arbitrary chapter text built from the vocabulary
fn chapter_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS.to_vec()), 0..160)
        .prop_map(|words| words.join(" "))
}

fn extract(text: &str) -> ConceptGraph {
    PIPELINE.extract(&ExtractionRequest::new(text, "computing").with_cross_domain(true))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_concept_has_nonempty_mentions(text in chapter_strategy()) {
        let graph = extract(&text);
        for concept in &graph.concepts {
            prop_assert!(!concept.mentions.is_empty());
            prop_assert_eq!(concept.first_mention, concept.mentions[0].offset);
            let char_len = text.chars().count();
            for mention in &concept.mentions {
                prop_assert!(!mention.context.trim().is_empty());
                prop_assert!(mention.offset < char_len);
            }
        }
    }

    #[test]
    fn prop_ids_unique_and_in_count_order(text in chapter_strategy()) {
        let request = ExtractionRequest::new(&text, "computing").with_cross_domain(true);
        let graph = PIPELINE.extract(&request);

        let ids: HashSet<&str> = graph.concepts.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(ids.len(), graph.concepts.len());
        for (i, concept) in graph.concepts.iter().enumerate() {
            prop_assert_eq!(&concept.id, &format!("concept-{}", i + 1));
        }

        let definitions = PIPELINE.resolve_dictionary(&request);
        let found = PIPELINE.term_matcher(&definitions).find(&IndexedText::new(&text));
        for pair in found.windows(2) {
            prop_assert!(pair[0].count() >= pair[1].count());
        }

        let kept: HashSet<&str> = graph.concepts.iter().map(|c| c.name.as_str()).collect();
        let matcher_order: Vec<&str> = found
            .iter()
            .map(|f| f.definition.name.as_str())
            .filter(|name| kept.contains(name))
            .collect();
        let graph_order: Vec<&str> = graph.concepts.iter().map(|c| c.name.as_str()).collect();
        prop_assert_eq!(matcher_order, graph_order);
    }

    #[test]
    fn prop_sequence_is_sorted_permutation(text in chapter_strategy()) {
        let graph = extract(&text);

        let mut sequence = graph.sequence.clone();
        let mut ids: Vec<String> = graph.concepts.iter().map(|c| c.id.clone()).collect();
        sequence.sort();
        ids.sort();
        prop_assert_eq!(sequence, ids);

        let offsets: Vec<usize> = graph
            .sequence
            .iter()
            .filter_map(|id| graph.concept(id))
            .map(|c| c.first_mention)
            .collect();
        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));

        let tiered = graph.hierarchy.core.len()
            + graph.hierarchy.supporting.len()
            + graph.hierarchy.detail.len();
        prop_assert_eq!(tiered, graph.concepts.len());
    }

    #[test]
    fn prop_relationships_are_valid(text in chapter_strategy()) {
        let graph = extract(&text);
        let mut pairs = HashSet::new();

        for rel in &graph.relationships {
            prop_assert!(rel.source != rel.target);
            prop_assert!(graph.concept(&rel.source).is_some());
            prop_assert!(graph.concept(&rel.target).is_some());
            prop_assert!((0.0..=1.0).contains(&rel.strength));

            let pair = if rel.source < rel.target {
                (rel.source.clone(), rel.target.clone())
            } else {
                (rel.target.clone(), rel.source.clone())
            };
            prop_assert!(pairs.insert(pair), "more than one relationship for a pair");
        }
    }

    #[test]
    fn prop_extraction_is_idempotent(text in chapter_strategy()) {
        prop_assert_eq!(extract(&text), extract(&text));
    }
}
