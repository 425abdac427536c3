//! Lexi Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the Lexi system:
//! - Concept dictionary models (definitions, importance tiers, dictionaries)
//! - Extraction output models (concepts, mentions, relationships, graph)
//! - Dictionary provider trait and slug id assignment
//! - Progress reporting for the extraction pipeline
//! - Common error types
//! - Configuration management

pub mod config;
pub mod graph;
pub mod ids;

pub use config::{AppConfig, ConfigError, DictionaryConfig, ExtractorConfig, LoggingConfig};
pub use ids::{assign_ids, slugify, unique_id};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Lexi operations
#[derive(Error, Debug)]
pub enum LexiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LexiError>;

// ============================================================================
// Dictionary Models
// ============================================================================

/// Expected pedagogical weight of a concept, assigned by the dictionary
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Core,
    #[default]
    Supporting,
    Detail,
}

impl Importance {
    /// All tiers, most important first
    pub const ALL: [Importance; 3] = [Self::Core, Self::Supporting, Self::Detail];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Supporting => "supporting",
            Self::Detail => "detail",
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Importance {
    type Err = LexiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "supporting" => Ok(Self::Supporting),
            "detail" => Ok(Self::Detail),
            _ => Err(LexiError::InvalidInput(format!(
                "unknown importance tier: {s}"
            ))),
        }
    }
}

/// A known domain term, as supplied by a dictionary provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDefinition {
    /// Stable identifier (assigned by the provider when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical name
    pub name: String,

    /// Alternate surface forms
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Classification label
    #[serde(default)]
    pub category: String,

    /// Optional finer classification label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Importance tier (`supporting` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,

    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Names of related concepts
    #[serde(default, rename = "relatedConcepts")]
    pub related: Vec<String>,
}

impl ConceptDefinition {
    /// Create a definition with just a name and category
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            aliases: Vec::new(),
            category: category.into(),
            subcategory: None,
            importance: None,
            description: None,
            related: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related = related.into_iter().map(Into::into).collect();
        self
    }

    /// Name followed by every alias
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Key used to bucket occurrences; falls back to the name for
    /// definitions that never went through id assignment.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Description, or a label synthesized from category/subcategory
    pub fn resolved_definition(&self) -> String {
        if let Some(description) = self.description.as_ref().filter(|d| !d.trim().is_empty()) {
            return description.clone();
        }

        match &self.subcategory {
            Some(sub) if !sub.is_empty() => format!("{} - {}", self.category, sub),
            _ => self.category.clone(),
        }
    }
}

/// Versioned vocabulary for one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDictionary {
    pub domain_name: String,
    pub version: String,
    pub concepts: Vec<ConceptDefinition>,
}

impl ConceptDictionary {
    /// Create a dictionary; concepts lacking an id receive a slug id
    pub fn new(
        domain_name: impl Into<String>,
        version: impl Into<String>,
        concepts: Vec<ConceptDefinition>,
    ) -> Self {
        let domain_name = domain_name.into();
        let concepts = assign_ids(&domain_name, concepts);
        Self {
            domain_name,
            version: version.into(),
            concepts,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

// ============================================================================
// Extraction Output Models
// ============================================================================

/// How deeply a mention treats its concept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionDepth {
    Introduced,
    #[default]
    Explained,
    Applied,
}

/// One confirmed occurrence of a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMention {
    /// Character offset of the match in the chapter text
    pub offset: usize,

    /// Surrounding text, with `...` where the window was truncated
    pub context: String,

    /// Always the default depth; not computed from content
    pub depth: MentionDepth,

    /// Reserved, always false
    pub is_revisit: bool,

    /// Reserved, always empty
    pub associated_concepts: Vec<String>,
}

impl ConceptMention {
    pub fn new(offset: usize, context: impl Into<String>) -> Self {
        Self {
            offset,
            context: context.into(),
            depth: MentionDepth::default(),
            is_revisit: false,
            associated_concepts: Vec::new(),
        }
    }
}

/// A domain concept confirmed present in the chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// `concept-<n>`, unique within one extraction run
    pub id: String,
    pub name: String,
    pub definition: String,
    pub importance: Importance,
    pub first_mention: usize,
    pub mentions: Vec<ConceptMention>,
    pub related_concepts: Vec<String>,
    pub prerequisites: Vec<String>,
}

/// Kind of relationship between two concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Related,
    Prerequisite,
    Contrasts,
    Example,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Prerequisite => "prerequisite",
            Self::Contrasts => "contrasts",
            Self::Example => "example",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = LexiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "related" => Ok(Self::Related),
            "prerequisite" => Ok(Self::Prerequisite),
            "contrasts" => Ok(Self::Contrasts),
            "example" => Ok(Self::Example),
            _ => Err(LexiError::InvalidInput(format!(
                "unknown relationship type: {s}"
            ))),
        }
    }
}

/// Directed relationship between two concept ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Always within [0, 1]
    pub strength: f32,
}

impl ConceptRelationship {
    /// Create a relationship, clamping strength to [0, 1]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship_type: RelationshipType,
        strength: f32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship_type,
            strength: strength.clamp(0.0, 1.0),
        }
    }
}

/// Concept ids partitioned by importance tier, each ordered by first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub core: Vec<String>,
    pub supporting: Vec<String>,
    pub detail: Vec<String>,
}

impl Hierarchy {
    pub fn tier(&self, importance: Importance) -> &[String] {
        match importance {
            Importance::Core => &self.core,
            Importance::Supporting => &self.supporting,
            Importance::Detail => &self.detail,
        }
    }

    pub fn tier_mut(&mut self, importance: Importance) -> &mut Vec<String> {
        match importance {
            Importance::Core => &mut self.core,
            Importance::Supporting => &mut self.supporting,
            Importance::Detail => &mut self.detail,
        }
    }
}

/// Final artifact of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptGraph {
    pub concepts: Vec<Concept>,
    pub relationships: Vec<ConceptRelationship>,
    pub hierarchy: Hierarchy,
    /// Concept ids ordered by first mention
    pub sequence: Vec<String>,
}

impl ConceptGraph {
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by canonical name
    pub fn concept_by_name(&self, name: &str) -> Option<&Concept> {
        self.concepts
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
    }

    /// Concepts of one tier, in first-appearance order
    pub fn concepts_in_tier(&self, importance: Importance) -> impl Iterator<Item = &Concept> {
        self.hierarchy
            .tier(importance)
            .iter()
            .filter_map(move |id| self.concept(id))
    }
}

// ============================================================================
// Progress Reporting
// ============================================================================

/// Pipeline phase boundaries reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPhase {
    Matching,
    Filtering,
    Relating,
    Prerequisites,
    Hierarchy,
    Sequencing,
    Complete,
}

impl ExtractionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matching => "matching",
            Self::Filtering => "filtering",
            Self::Relating => "relating",
            Self::Prerequisites => "prerequisites",
            Self::Hierarchy => "hierarchy",
            Self::Sequencing => "sequencing",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for ExtractionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receiver of phase-completion notifications.
///
/// Implementations must return promptly; the pipeline calls them inline.
pub trait ProgressSink {
    fn on_progress(&self, phase: ExtractionPhase, detail: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(ExtractionPhase, &str),
{
    fn on_progress(&self, phase: ExtractionPhase, detail: &str) {
        self(phase, detail)
    }
}

/// Sink that discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _phase: ExtractionPhase, _detail: &str) {}
}

// ============================================================================
// Traits
// ============================================================================

/// Source of concept dictionaries, keyed by domain
pub trait DictionaryProvider: Send + Sync {
    /// Dictionary for a domain, or `None` when the domain is unknown
    fn dictionary_for_domain(&self, domain: &str) -> Option<ConceptDictionary>;

    /// Concepts that apply across every domain
    fn cross_domain_concepts(&self) -> Vec<ConceptDefinition> {
        Vec::new()
    }

    /// Names of the domains this provider knows
    fn domains(&self) -> Vec<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

impl<T: DictionaryProvider + ?Sized> DictionaryProvider for Box<T> {
    fn dictionary_for_domain(&self, domain: &str) -> Option<ConceptDictionary> {
        (**self).dictionary_for_domain(domain)
    }

    fn cross_domain_concepts(&self) -> Vec<ConceptDefinition> {
        (**self).cross_domain_concepts()
    }

    fn domains(&self) -> Vec<String> {
        (**self).domains()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// Tests
// ============================================================================
