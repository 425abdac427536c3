//! Lexi Extractor - Concept extraction pipeline
//!
//! Finds which dictionary concepts a chapter mentions, where and how often,
//! and how they relate:
//! - [`matcher`]: whole-word term matching against the run dictionary
//! - [`mention`]: context windows and table-of-contents noise filtering
//! - [`relation`]: co-occurrence, prerequisite, contrast, and example inference
//! - [`hierarchy`]: importance tiers, first-appearance sequence, prerequisites
//! - [`pipeline`]: the orchestrator that runs all of the above
//! - [`metrics`]: precision/recall scoring against a gold standard
//!
//! Offsets in the output count characters, not bytes.

pub mod hierarchy;
pub mod matcher;
pub mod mention;
pub mod metrics;
pub mod pipeline;
pub mod relation;
pub mod text;

pub use matcher::{FoundConcept, Occurrence, PatternCache, TermMatcher};
pub use mention::MentionFilter;
pub use metrics::{AggregateMetrics, Evaluator, GoldRelationship, GoldStandard};
pub use pipeline::{validate_text, ConceptPipeline, ExtractionRequest};
pub use relation::RelationshipInferencer;
pub use text::IndexedText;
