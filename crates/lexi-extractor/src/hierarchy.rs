//! Hierarchy and sequence building
//!
//! Partitions concepts by importance tier, orders concepts by first
//! appearance, and back-fills each concept's prerequisite list from the
//! inferred `prerequisite` relationships.

use lexi_core::{Concept, ConceptRelationship, Hierarchy, RelationshipType};

/// Append each prerequisite source to its target's list, once
pub fn populate_prerequisites(concepts: &mut [Concept], relationships: &[ConceptRelationship]) {
    for rel in relationships
        .iter()
        .filter(|r| r.relationship_type == RelationshipType::Prerequisite)
    {
        if let Some(target) = concepts.iter_mut().find(|c| c.id == rel.target) {
            if !target.prerequisites.contains(&rel.source) {
                target.prerequisites.push(rel.source.clone());
            }
        }
    }
}

/// Concept ids per tier, each tier ordered by first mention
pub fn build_hierarchy(concepts: &[Concept]) -> Hierarchy {
    let mut hierarchy = Hierarchy::default();
    for concept in by_first_mention(concepts) {
        hierarchy
            .tier_mut(concept.importance)
            .push(concept.id.clone());
    }
    hierarchy
}

/// All concept ids ordered by first mention
pub fn build_sequence(concepts: &[Concept]) -> Vec<String> {
    by_first_mention(concepts)
        .into_iter()
        .map(|c| c.id.clone())
        .collect()
}

/// Stable sort, so concepts sharing an offset keep id order
fn by_first_mention(concepts: &[Concept]) -> Vec<&Concept> {
    let mut ordered: Vec<&Concept> = concepts.iter().collect();
    ordered.sort_by_key(|c| c.first_mention);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::Importance;

    fn concept(id: &str, importance: Importance, first_mention: usize) -> Concept {
        Concept {
            id: id.to_string(),
            name: id.to_string(),
            definition: String::new(),
            importance,
            first_mention,
            mentions: Vec::new(),
            related_concepts: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    #[test]
    fn test_hierarchy_partitions_by_tier_in_appearance_order() {
        let concepts = vec![
            concept("concept-1", Importance::Core, 90),
            concept("concept-2", Importance::Detail, 5),
            concept("concept-3", Importance::Core, 10),
            concept("concept-4", Importance::Supporting, 40),
        ];

        let hierarchy = build_hierarchy(&concepts);
        assert_eq!(hierarchy.core, vec!["concept-3", "concept-1"]);
        assert_eq!(hierarchy.supporting, vec!["concept-4"]);
        assert_eq!(hierarchy.detail, vec!["concept-2"]);
    }

    #[test]
    fn test_sequence_is_first_mention_order() {
        let concepts = vec![
            concept("concept-1", Importance::Core, 90),
            concept("concept-2", Importance::Detail, 5),
            concept("concept-3", Importance::Core, 5),
        ];
        assert_eq!(
            build_sequence(&concepts),
            vec!["concept-2", "concept-3", "concept-1"]
        );
    }

    #[test]
    fn test_populate_prerequisites_skips_duplicates_and_other_types() {
        let mut concepts = vec![
            concept("concept-1", Importance::Core, 0),
            concept("concept-2", Importance::Core, 10),
        ];
        let relationships = vec![
            ConceptRelationship::new("concept-1", "concept-2", RelationshipType::Prerequisite, 1.0),
            ConceptRelationship::new("concept-1", "concept-2", RelationshipType::Prerequisite, 0.7),
            ConceptRelationship::new("concept-2", "concept-1", RelationshipType::Related, 0.2),
        ];

        populate_prerequisites(&mut concepts, &relationships);
        assert_eq!(concepts[1].prerequisites, vec!["concept-1"]);
        assert!(concepts[0].prerequisites.is_empty());
    }
}
