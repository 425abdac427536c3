//! petgraph view of a concept graph
//!
//! Downstream scoring walks relationships as a directed graph; this module
//! builds that graph and derives a prerequisite-respecting concept order.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::{ConceptGraph, RelationshipType};

impl ConceptGraph {
    /// Directed graph with one node per concept id and one edge per relationship
    pub fn to_petgraph(&self) -> DiGraph<String, RelationshipType> {
        self.build_petgraph(|_| true)
    }

    /// Concept ids ordered so every prerequisite precedes the concepts that
    /// need it. `None` when the prerequisite edges contain a cycle.
    pub fn prerequisite_order(&self) -> Option<Vec<String>> {
        let graph = self.build_petgraph(|kind| kind == RelationshipType::Prerequisite);

        toposort(&graph, None)
            .ok()
            .map(|order| order.into_iter().map(|idx| graph[idx].clone()).collect())
    }

    fn build_petgraph<F>(&self, include: F) -> DiGraph<String, RelationshipType>
    where
        F: Fn(RelationshipType) -> bool,
    {
        let mut graph = DiGraph::with_capacity(self.concepts.len(), self.relationships.len());
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

        let ordered_ids = self
            .sequence
            .iter()
            .chain(self.concepts.iter().map(|c| &c.id));
        for id in ordered_ids {
            nodes
                .entry(id.as_str())
                .or_insert_with(|| graph.add_node(id.clone()));
        }

        for rel in &self.relationships {
            if !include(rel.relationship_type) {
                continue;
            }
            if let (Some(&from), Some(&to)) =
                (nodes.get(rel.source.as_str()), nodes.get(rel.target.as_str()))
            {
                graph.add_edge(from, to, rel.relationship_type);
            }
        }

        graph
    }
}
