//! Slug id assignment for concept definitions

use std::collections::HashSet;

use crate::ConceptDefinition;

/// Lowercase ASCII slug: alphanumeric runs joined by single `-`
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Give every definition without an id a unique `<domain>-<name>` slug.
///
/// Explicit ids are kept as-is and reserved first, so generated ids never
/// shadow them. Collisions get a numeric suffix starting at `-2`.
pub fn assign_ids(domain: &str, concepts: Vec<ConceptDefinition>) -> Vec<ConceptDefinition> {
    let mut taken: HashSet<String> = concepts.iter().filter_map(|c| c.id.clone()).collect();

    concepts
        .into_iter()
        .map(|mut concept| {
            if concept.id.is_none() {
                let base = slugify(&format!("{} {}", domain, concept.name));
                concept.id = Some(unique_id(&base, &mut taken));
            }
            concept
        })
        .collect()
}

/// Reserve `base` (or the first free `base-<n>`) in `taken`
pub fn unique_id(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }

    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Computing Big-O  Notation"), "computing-big-o-notation");
        assert_eq!(slugify("  C++ "), "c");
        assert_eq!(slugify("pH scale"), "ph-scale");
    }

    #[test]
    fn test_assign_ids_collision_suffix() {
        let concepts = vec![
            ConceptDefinition::new("loop", "control"),
            ConceptDefinition::new("Loop", "control"),
            ConceptDefinition::new("loop!", "control"),
        ];
        let ids: Vec<String> = assign_ids("computing", concepts)
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        assert_eq!(
            ids,
            vec!["computing-loop", "computing-loop-2", "computing-loop-3"]
        );
    }

    #[test]
    fn test_assign_ids_keeps_explicit() {
        let concepts = vec![
            ConceptDefinition::new("array", "data").with_id("computing-array"),
            ConceptDefinition::new("array", "data"),
        ];
        let assigned = assign_ids("computing", concepts);
        assert_eq!(assigned[0].id.as_deref(), Some("computing-array"));
        assert_eq!(assigned[1].id.as_deref(), Some("computing-array-2"));
    }
}
