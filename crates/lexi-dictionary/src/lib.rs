//! Lexi Dictionary - curated domain vocabularies
//!
//! Provides two [`DictionaryProvider`](lexi_core::DictionaryProvider) implementations:
//! - [`BuiltinDictionaries`]: versioned vocabularies compiled into the binary
//! - [`FileDictionaryProvider`]: JSON/TOML dictionaries loaded from a directory

pub mod builtin;
pub mod file;

pub use builtin::BuiltinDictionaries;
pub use file::FileDictionaryProvider;

use lexi_core::{ConceptDefinition, Importance};

/// Domain key used for concepts that apply everywhere
pub const CROSS_DOMAIN: &str = "cross-domain";

/// Shorthand for a dictionary entry with its category, tier, and aliases
pub fn term(
    name: &str,
    category: &str,
    importance: Importance,
    aliases: &[&str],
) -> ConceptDefinition {
    ConceptDefinition::new(name, category)
        .with_importance(importance)
        .with_aliases(aliases.iter().copied())
}

/// Normalized lookup key for a domain name
pub(crate) fn domain_key(domain: &str) -> String {
    domain.trim().to_lowercase()
}
