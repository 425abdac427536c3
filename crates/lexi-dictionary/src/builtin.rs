//! Built-in concept vocabularies
//!
//! Each domain is a static, versioned list. Ids are slug-assigned when the
//! dictionary is first touched.

use once_cell::sync::Lazy;

use lexi_core::{ConceptDefinition, ConceptDictionary, DictionaryProvider, Importance};

use crate::{domain_key, term, CROSS_DOMAIN};

use Importance::{Core, Detail, Supporting};

// ============================================================================
// Computing
// ============================================================================

static COMPUTING: Lazy<ConceptDictionary> =
    Lazy::new(|| ConceptDictionary::new("computing", "1.2.0", computing_concepts()));

fn computing_concepts() -> Vec<ConceptDefinition> {
    vec![
        term("variable", "programming fundamentals", Core, &["variables"])
            .with_description("A named storage location that holds a value")
            .with_related(["data type", "assignment"]),
        term("data type", "programming fundamentals", Core, &["data types", "type"])
            .with_subcategory("types"),
        term("assignment", "programming fundamentals", Supporting, &["assign", "assigned"]),
        term("loop", "control flow", Core, &["loops"])
            .with_subcategory("iteration")
            .with_related(["iteration", "conditional"]),
        term("iteration", "control flow", Supporting, &["iterate", "iterations"])
            .with_subcategory("iteration"),
        term("conditional", "control flow", Core, &["conditionals", "if statement"])
            .with_subcategory("branching"),
        term("function", "abstraction", Core, &["functions", "function call"])
            .with_description("A reusable, named block of code that can take parameters and return a value")
            .with_related(["parameter", "return value"]),
        term("parameter", "abstraction", Supporting, &["parameters", "argument", "arguments"]),
        term("return value", "abstraction", Detail, &["return values"]),
        term("recursion", "abstraction", Core, &["recursive"])
            .with_related(["function", "base case"]),
        term("base case", "abstraction", Detail, &["base cases"]).with_subcategory("recursion"),
        term("array", "data structures", Core, &["arrays"]).with_subcategory("linear"),
        term("linked list", "data structures", Supporting, &["linked lists"])
            .with_subcategory("linear"),
        term("stack", "data structures", Supporting, &["stacks"]).with_subcategory("linear"),
        term("queue", "data structures", Supporting, &["queues"]).with_subcategory("linear"),
        term("hash table", "data structures", Supporting, &["hash tables", "hash map"])
            .with_subcategory("associative"),
        term("tree", "data structures", Supporting, &["trees"]).with_subcategory("hierarchical"),
        term("algorithm", "algorithms", Core, &["algorithms"])
            .with_description("A finite sequence of well-defined steps that solves a problem"),
        term("sorting", "algorithms", Supporting, &["sort", "sorted"]),
        term("binary search", "algorithms", Supporting, &[]).with_subcategory("searching"),
        term("big-o notation", "algorithms", Detail, &["big o", "time complexity"])
            .with_subcategory("analysis"),
        term("class", "object-oriented programming", Core, &["classes"])
            .with_related(["object", "inheritance"]),
        term("object", "object-oriented programming", Core, &["objects"]),
        term("inheritance", "object-oriented programming", Supporting, &["inherits", "subclass"]),
        term("compiler", "tooling", Detail, &["compilers", "compile"]),
    ]
}

// ============================================================================
// Chemistry
// ============================================================================

static CHEMISTRY: Lazy<ConceptDictionary> =
    Lazy::new(|| ConceptDictionary::new("chemistry", "1.1.0", chemistry_concepts()));

fn chemistry_concepts() -> Vec<ConceptDefinition> {
    vec![
        term("atom", "atomic structure", Core, &["atoms"])
            .with_description("The smallest unit of an element that keeps its chemical properties"),
        term("electron", "atomic structure", Core, &["electrons"]).with_subcategory("subatomic particles"),
        term("proton", "atomic structure", Supporting, &["protons"]).with_subcategory("subatomic particles"),
        term("neutron", "atomic structure", Supporting, &["neutrons"]).with_subcategory("subatomic particles"),
        term("isotope", "atomic structure", Detail, &["isotopes"]),
        term("element", "periodic table", Core, &["elements"]),
        term("periodic table", "periodic table", Supporting, &[]),
        term("molecule", "bonding", Core, &["molecules"]).with_related(["atom", "covalent bond"]),
        term("covalent bond", "bonding", Supporting, &["covalent bonds", "covalent bonding"]),
        term("ionic bond", "bonding", Supporting, &["ionic bonds", "ionic bonding"]),
        term("ion", "bonding", Supporting, &["ions"]),
        term("chemical reaction", "reactions", Core, &["chemical reactions", "reaction", "reactions"]),
        term("reactant", "reactions", Supporting, &["reactants"]),
        term("product", "reactions", Supporting, &["products"]),
        term("catalyst", "reactions", Detail, &["catalysts"]).with_subcategory("kinetics"),
        term("acid", "acids and bases", Core, &["acids"]).with_related(["base", "ph"]),
        term("base", "acids and bases", Core, &["bases", "alkali"]),
        term("ph", "acids and bases", Supporting, &["ph scale"]),
        term("mole", "stoichiometry", Core, &["moles"])
            .with_description("The amount of substance containing Avogadro's number of particles"),
        term("molar mass", "stoichiometry", Detail, &[]),
    ]
}

// ============================================================================
// Mathematics
// ============================================================================

static MATHEMATICS: Lazy<ConceptDictionary> =
    Lazy::new(|| ConceptDictionary::new("mathematics", "1.0.3", mathematics_concepts()));

fn mathematics_concepts() -> Vec<ConceptDefinition> {
    vec![
        term("number", "arithmetic", Supporting, &["numbers"]),
        term("fraction", "arithmetic", Core, &["fractions"]).with_related(["ratio"]),
        term("ratio", "arithmetic", Supporting, &["ratios"]),
        term("equation", "algebra", Core, &["equations"])
            .with_description("A statement that two expressions are equal"),
        term("expression", "algebra", Supporting, &["expressions"]),
        term("polynomial", "algebra", Supporting, &["polynomials"]),
        term("function", "algebra", Core, &["functions"]).with_subcategory("relations"),
        term("slope", "algebra", Supporting, &[]).with_subcategory("linear functions"),
        term("triangle", "geometry", Core, &["triangles"]),
        term("angle", "geometry", Supporting, &["angles"]),
        term("pythagorean theorem", "geometry", Core, &["pythagoras"])
            .with_related(["triangle"]),
        term("derivative", "calculus", Core, &["derivatives", "differentiation"])
            .with_related(["limit"]),
        term("limit", "calculus", Core, &["limits"]),
        term("integral", "calculus", Core, &["integrals", "integration"]),
        term("matrix", "linear algebra", Supporting, &["matrices"]),
        term("vector", "linear algebra", Supporting, &["vectors"]),
        term("probability", "statistics", Core, &["probabilities"]),
        term("mean", "statistics", Supporting, &["average"]).with_subcategory("central tendency"),
        term("median", "statistics", Detail, &[]).with_subcategory("central tendency"),
        term("proof", "reasoning", Detail, &["proofs"]),
    ]
}

// ============================================================================
// Biology
// ============================================================================

static BIOLOGY: Lazy<ConceptDictionary> =
    Lazy::new(|| ConceptDictionary::new("biology", "1.0.0", biology_concepts()));

fn biology_concepts() -> Vec<ConceptDefinition> {
    vec![
        term("cell", "cell biology", Core, &["cells"])
            .with_description("The basic structural and functional unit of living organisms"),
        term("nucleus", "cell biology", Supporting, &["nuclei"]).with_subcategory("organelles"),
        term("mitochondria", "cell biology", Supporting, &["mitochondrion"])
            .with_subcategory("organelles"),
        term("membrane", "cell biology", Supporting, &["cell membrane", "membranes"]),
        term("dna", "genetics", Core, &["deoxyribonucleic acid"]),
        term("gene", "genetics", Core, &["genes"]).with_related(["dna", "protein"]),
        term("protein", "molecular biology", Supporting, &["proteins"]),
        term("enzyme", "molecular biology", Supporting, &["enzymes"]),
        term("photosynthesis", "physiology", Core, &[]),
        term("respiration", "physiology", Supporting, &["cellular respiration"]),
        term("evolution", "evolution", Core, &["evolve", "evolved"])
            .with_related(["natural selection"]),
        term("natural selection", "evolution", Core, &[]),
        term("species", "ecology", Supporting, &[]),
        term("ecosystem", "ecology", Supporting, &["ecosystems"]),
        term("mammal", "classification", Supporting, &["mammals"]),
        term("organism", "classification", Detail, &["organisms"]),
    ]
}

// ============================================================================
// Cross-domain
// ============================================================================

static CROSS_DOMAIN_CONCEPTS: Lazy<Vec<ConceptDefinition>> = Lazy::new(|| {
    lexi_core::assign_ids(
        CROSS_DOMAIN,
        vec![
            term("hypothesis", "scientific method", Core, &["hypotheses"]),
            term("model", "scientific method", Supporting, &["models"]),
            term("experiment", "scientific method", Supporting, &["experiments"]),
            term("evidence", "scientific method", Supporting, &[]),
            term("system", "systems thinking", Supporting, &["systems"]),
            term("pattern", "systems thinking", Detail, &["patterns"]),
            term("abstraction", "reasoning", Supporting, &["abstractions"]),
            term("definition", "reasoning", Detail, &["definitions"]),
        ],
    )
});

// ============================================================================
// Provider
// ============================================================================

/// Provider over the compiled-in vocabularies
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDictionaries;

impl BuiltinDictionaries {
    pub fn new() -> Self {
        Self
    }

    fn lookup(domain: &str) -> Option<&'static ConceptDictionary> {
        match domain_key(domain).as_str() {
            "computing" | "computer science" => Some(&*COMPUTING),
            "chemistry" => Some(&*CHEMISTRY),
            "mathematics" | "math" | "maths" => Some(&*MATHEMATICS),
            "biology" => Some(&*BIOLOGY),
            _ => None,
        }
    }
}

impl DictionaryProvider for BuiltinDictionaries {
    fn dictionary_for_domain(&self, domain: &str) -> Option<ConceptDictionary> {
        Self::lookup(domain).cloned()
    }

    fn cross_domain_concepts(&self) -> Vec<ConceptDefinition> {
        CROSS_DOMAIN_CONCEPTS.clone()
    }

    fn domains(&self) -> Vec<String> {
        [&COMPUTING, &CHEMISTRY, &MATHEMATICS, &BIOLOGY]
            .iter()
            .map(|d| d.domain_name.clone())
            .collect()
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_known_domains() {
        let provider = BuiltinDictionaries::new();
        assert_eq!(
            provider.domains(),
            vec!["computing", "chemistry", "mathematics", "biology"]
        );
    }

    #[test]
    fn test_domain_lookup_case_insensitive() {
        let provider = BuiltinDictionaries::new();
        let dict = provider.dictionary_for_domain("  Chemistry ").unwrap();
        assert_eq!(dict.domain_name, "chemistry");
        assert!(!dict.is_empty());
        assert!(provider.dictionary_for_domain("astrology").is_none());
    }

    #[test]
    fn test_every_concept_has_unique_id() {
        let provider = BuiltinDictionaries::new();
        for domain in provider.domains() {
            let dict = provider.dictionary_for_domain(&domain).unwrap();
            let ids: HashSet<&str> = dict
                .concepts
                .iter()
                .map(|c| c.id.as_deref().unwrap())
                .collect();
            assert_eq!(ids.len(), dict.len(), "duplicate id in {domain}");
        }
    }

    #[test]
    fn test_slug_ids() {
        let dict = BuiltinDictionaries::new()
            .dictionary_for_domain("computing")
            .unwrap();
        let hash_table = dict.concepts.iter().find(|c| c.name == "hash table").unwrap();
        assert_eq!(hash_table.id.as_deref(), Some("computing-hash-table"));
    }

    #[test]
    fn test_cross_domain_concepts() {
        let concepts = BuiltinDictionaries::new().cross_domain_concepts();
        assert!(concepts.iter().any(|c| c.name == "hypothesis"));
        assert!(concepts
            .iter()
            .all(|c| c.id.as_deref().unwrap().starts_with("cross-domain-")));
    }
}
