//! Quality Metrics module
//!
//! Scores an extracted concept graph against a hand-labelled gold standard:
//! precision, recall, and F1 for concepts (by name) and for relationships
//! (by endpoint names and, optionally, type).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use lexi_core::{ConceptGraph, RelationshipType};

// ============================================================================
// Metrics
// ============================================================================

/// Confusion counts for one evaluated item kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    /// Predicted and present in the gold standard
    pub true_positives: usize,
    /// Predicted but not in the gold standard
    pub false_positives: usize,
    /// In the gold standard but not predicted
    pub false_negatives: usize,
}

impl MatchCounts {
    fn from_sets<T: Eq + std::hash::Hash>(predicted: &HashSet<T>, gold: &HashSet<T>) -> Self {
        let true_positives = predicted.intersection(gold).count();
        Self {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: gold.len() - true_positives,
        }
    }

    pub fn gold_total(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn predicted_total(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f32 {
        ratio(self.true_positives, self.predicted_total())
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f32 {
        ratio(self.true_positives, self.gold_total())
    }

    /// Harmonic mean of precision and recall
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    fn add(&mut self, other: &MatchCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

pub type ConceptMetrics = MatchCounts;
pub type RelationshipMetrics = MatchCounts;

// ============================================================================
// Gold Standard Types
// ============================================================================

/// An expected relationship, by concept names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRelationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
}

/// Hand-labelled expectations for one chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldStandard {
    /// Concept names expected in the output
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<GoldRelationship>,
}

/// Scores for one chapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEvaluation {
    pub concepts: ConceptMetrics,
    pub relationships: RelationshipMetrics,
}

// ============================================================================
// Evaluator
// ============================================================================

/// Relationship key: normalized endpoint names plus optional type
type RelationshipKey = (String, String, Option<RelationshipType>);

/// Evaluator for extraction quality
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Relationship direction must match
    strict: bool,
    /// Relationship type must match
    match_types: bool,
}

impl Evaluator {
    /// Relaxed direction, types must match
    pub fn new() -> Self {
        Self {
            strict: false,
            match_types: true,
        }
    }

    /// Require source and target to match in order
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_type_matching(mut self, match_types: bool) -> Self {
        self.match_types = match_types;
        self
    }

    pub fn evaluate(&self, graph: &ConceptGraph, gold: &GoldStandard) -> ChapterEvaluation {
        ChapterEvaluation {
            concepts: self.evaluate_concepts(graph, &gold.concepts),
            relationships: self.evaluate_relationships(graph, &gold.relationships),
        }
    }

    /// Compare concept names, case-insensitively
    pub fn evaluate_concepts(&self, graph: &ConceptGraph, gold: &[String]) -> ConceptMetrics {
        let predicted: HashSet<String> = graph.concepts.iter().map(|c| normalize(&c.name)).collect();
        let gold: HashSet<String> = gold.iter().map(|name| normalize(name)).collect();
        MatchCounts::from_sets(&predicted, &gold)
    }

    /// Compare relationships by endpoint names
    pub fn evaluate_relationships(
        &self,
        graph: &ConceptGraph,
        gold: &[GoldRelationship],
    ) -> RelationshipMetrics {
        let predicted: HashSet<RelationshipKey> = graph
            .relationships
            .iter()
            .filter_map(|rel| {
                let source = graph.concept(&rel.source)?;
                let target = graph.concept(&rel.target)?;
                Some(self.key(&source.name, &target.name, rel.relationship_type))
            })
            .collect();
        let gold: HashSet<RelationshipKey> = gold
            .iter()
            .map(|g| self.key(&g.source, &g.target, g.relationship_type))
            .collect();

        MatchCounts::from_sets(&predicted, &gold)
    }

    fn key(&self, source: &str, target: &str, relationship_type: RelationshipType) -> RelationshipKey {
        let (mut a, mut b) = (normalize(source), normalize(target));
        if !self.strict && a > b {
            std::mem::swap(&mut a, &mut b);
        }
        (a, b, self.match_types.then_some(relationship_type))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// Aggregate Metrics
// ============================================================================

/// Running totals over a batch of chapters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub concept_metrics: ConceptMetrics,
    pub relationship_metrics: RelationshipMetrics,
    pub num_chapters: usize,
}

impl AggregateMetrics {
    pub fn add_chapter(&mut self, evaluation: &ChapterEvaluation) {
        self.concept_metrics.add(&evaluation.concepts);
        self.relationship_metrics.add(&evaluation.relationships);
        self.num_chapters += 1;
    }

    /// Render a plain-text summary
    pub fn report(&self) -> String {
        format!(
            "=== Concept Extraction Quality Report ===\n\n\
             Chapters evaluated: {}\n\n\
             {}\n\
             {}",
            self.num_chapters,
            section("Concepts", &self.concept_metrics),
            section("Relationships", &self.relationship_metrics),
        )
    }
}

fn section(title: &str, m: &MatchCounts) -> String {
    format!(
        "{}:\n  \
         Precision: {:.1}%\n  \
         Recall:    {:.1}%\n  \
         F1 Score:  {:.1}%\n  \
         Gold: {} | Predicted: {} | TP: {} | FP: {} | FN: {}\n",
        title,
        m.precision() * 100.0,
        m.recall() * 100.0,
        m.f1_score() * 100.0,
        m.gold_total(),
        m.predicted_total(),
        m.true_positives,
        m.false_positives,
        m.false_negatives,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::{Concept, ConceptRelationship, Importance};

    fn concept(id: &str, name: &str) -> Concept {
        Concept {
            id: id.to_string(),
            name: name.to_string(),
            definition: String::new(),
            importance: Importance::Supporting,
            first_mention: 0,
            mentions: Vec::new(),
            related_concepts: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    fn graph() -> ConceptGraph {
        ConceptGraph {
            concepts: vec![
                concept("concept-1", "mammal"),
                concept("concept-2", "dog"),
                concept("concept-3", "cell"),
            ],
            relationships: vec![
                ConceptRelationship::new("concept-2", "concept-1", RelationshipType::Example, 0.8),
                ConceptRelationship::new("concept-1", "concept-3", RelationshipType::Related, 0.2),
            ],
            ..Default::default()
        }
    }

    fn gold_rel(source: &str, target: &str, relationship_type: RelationshipType) -> GoldRelationship {
        GoldRelationship {
            source: source.to_string(),
            target: target.to_string(),
            relationship_type,
        }
    }

    #[test]
    fn test_counts_precision_recall_f1() {
        let m = MatchCounts {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 2,
        };
        assert!((m.precision() - 0.8).abs() < 0.001);
        assert!((m.recall() - 0.8).abs() < 0.001);
        assert!((m.f1_score() - 0.8).abs() < 0.001);
        assert_eq!(MatchCounts::default().f1_score(), 0.0);
    }

    #[test]
    fn test_evaluate_concepts_case_insensitive() {
        let gold = vec!["Mammal".to_string(), "DOG".to_string(), "tissue".to_string()];
        let m = Evaluator::new().evaluate_concepts(&graph(), &gold);

        assert_eq!(m.true_positives, 2);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.false_negatives, 1);
    }

    #[test]
    fn test_relationship_direction_relaxed_by_default() {
        let gold = vec![gold_rel("mammal", "dog", RelationshipType::Example)];

        let relaxed = Evaluator::new().evaluate_relationships(&graph(), &gold);
        assert_eq!(relaxed.true_positives, 1);

        let strict = Evaluator::new().strict().evaluate_relationships(&graph(), &gold);
        assert_eq!(strict.true_positives, 0);
        assert_eq!(strict.false_negatives, 1);
    }

    #[test]
    fn test_relationship_type_matching_toggle() {
        let gold = vec![gold_rel("mammal", "cell", RelationshipType::Prerequisite)];

        let typed = Evaluator::new().evaluate_relationships(&graph(), &gold);
        assert_eq!(typed.true_positives, 0);

        let untyped = Evaluator::new()
            .with_type_matching(false)
            .evaluate_relationships(&graph(), &gold);
        assert_eq!(untyped.true_positives, 1);
    }

    #[test]
    fn test_gold_standard_from_json() {
        let json = r#"{
            "concepts": ["mammal", "dog"],
            "relationships": [{"source": "dog", "target": "mammal", "type": "example"}]
        }"#;
        let gold: GoldStandard = serde_json::from_str(json).unwrap();
        let eval = Evaluator::new().strict().evaluate(&graph(), &gold);

        assert_eq!(eval.concepts.recall(), 1.0);
        assert_eq!(eval.relationships.true_positives, 1);
    }

    #[test]
    fn test_aggregate_report() {
        let mut aggregate = AggregateMetrics::default();
        let gold = GoldStandard {
            concepts: vec!["dog".to_string()],
            relationships: Vec::new(),
        };
        let eval = Evaluator::new().evaluate(&graph(), &gold);
        aggregate.add_chapter(&eval);
        aggregate.add_chapter(&eval);

        assert_eq!(aggregate.num_chapters, 2);
        assert_eq!(aggregate.concept_metrics.true_positives, 2);

        let report = aggregate.report();
        assert!(report.contains("Chapters evaluated: 2"));
        assert!(report.contains("Concepts:"));
        assert!(report.contains("Relationships:"));
    }
}
