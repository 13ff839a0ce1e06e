//! The lexicon: typed word senses and relation templates.
//!
//! Maps (syntactic category, word) pairs to ordered collections of senses:
//!
//! - **Noun senses**: a conjunctive type restriction plus the base query
//!   fragment the noun contributes, optionally marked as a relational noun
//!   ("author" expects an object phrase).
//! - **Adjective senses**: a fixed entity reference with its type
//!   restriction ("Canadian" → the country Canada).
//! - **Relational-noun templates**: how a relational head attaches its
//!   object, both in `N of DP` and — inverted — in `NBar with DP`.
//! - **Adjective attachment rules**: which attribute types may modify which
//!   phrase types, and through which property.
//! - **The predicate table** ([`PredicateTable`]).
//!
//! Built once at startup from the external extraction packs plus
//! hand-authored overrides ([`overrides`]), merged in that fixed order;
//! overrides only append, and exact duplicates are dropped. Read-only
//! afterwards.

pub mod morph;
pub mod overrides;
pub mod pack;
pub mod predicate;

pub use pack::ExtractionPack;
pub use predicate::{
    ConceptualPredicate, Lexicalization, PredicateSense, PredicateTable, SurfaceCat,
};

use std::collections::{BTreeSet, HashMap};

use unicode_normalization::UnicodeNormalization;

use crate::query::Fragment;
use crate::typeset::{TypeId, TypeSet};

/// One interpretation of a noun: the types it restricts its referent to and
/// the query fragment it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct NounSense {
    pub types: TypeSet,
    /// Base fragment the noun contributes when it heads a phrase.
    pub base: Fragment,
    /// Relational-head label, when the noun expects an object phrase.
    pub head: Option<String>,
}

impl NounSense {
    /// The standard sense of a type-denoting noun: request `mid`/`name` and
    /// constrain `type`.
    pub fn typed(ty: impl Into<TypeId>) -> Self {
        let ty = ty.into();
        Self {
            base: Fragment::new()
                .with_null("mid")
                .with_null("name")
                .with_text("type", ty.as_str()),
            types: TypeSet::single(ty.clone()),
            head: None,
        }
    }

    /// The sense of an unconstrained noun ("thing", "anything").
    pub fn untyped() -> Self {
        Self {
            types: TypeSet::empty(),
            base: Fragment::new().with_null("mid").with_null("name"),
            head: None,
        }
    }

    /// A sense with an explicit fragment (typed nouns carrying extra
    /// property constraints, relational nouns with bespoke base queries).
    pub fn custom(types: TypeSet, base: Fragment) -> Self {
        Self {
            types,
            base,
            head: None,
        }
    }

    /// Mark this sense as a relational noun with the given head label.
    pub fn relational(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }
}

/// One interpretation of an adjective: a fixed entity reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjSense {
    pub types: TypeSet,
    /// Fragment denoting the referenced entity (`'name': null, 'mid': ...`).
    pub reference: Fragment,
}

impl AdjSense {
    pub fn entity(ty: impl Into<TypeId>, mid: impl Into<String>) -> Self {
        Self {
            types: TypeSet::single(ty),
            reference: Fragment::new().with_null("name").with_text("mid", mid),
        }
    }
}

/// How a relational noun attaches its object phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationalNoun {
    pub head: String,
    /// Types required of the `of`-object.
    pub object_types: TypeSet,
    /// Template for `N of DP`, with a hole for the object fragment. The
    /// template replaces the noun's own base fragment entirely.
    pub of_template: Fragment,
    /// Inverse attachment for `NBar with DP` when the object phrase is
    /// headed by this relational noun ("books with author X").
    pub with_attachment: Option<WithAttachment>,
}

/// Inverse attachment of a relational noun: constrain the outer phrase by
/// the relational object ("city with mayor X").
#[derive(Debug, Clone, PartialEq)]
pub struct WithAttachment {
    /// Types required of the outer noun-bar.
    pub subject_types: TypeSet,
    /// Types required of the relational object phrase.
    pub object_types: TypeSet,
    /// Types the composed phrase acquires.
    pub result_types: TypeSet,
    /// Constraints appended to the outer fragment, with a hole for the
    /// object fragment.
    pub attachment: Fragment,
}

/// An adjective attachment rule: attributes of `attribute_types` may modify
/// phrases of `phrase_types` through `property`, typing the result.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjectiveRule {
    pub attribute_types: TypeSet,
    pub phrase_types: TypeSet,
    pub result_type: TypeId,
    pub property: String,
}

/// The complete lexicon. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    nouns: HashMap<String, Vec<NounSense>>,
    adjectives: HashMap<String, Vec<AdjSense>>,
    adjective_rules: Vec<AdjectiveRule>,
    relational: HashMap<String, RelationalNoun>,
    predicates: PredicateTable,
    type_names: HashMap<TypeId, String>,
    property_names: HashMap<String, String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unicode-compose a surface word so pack data and parser output agree
    /// on a single representation. Lookups stay case-sensitive: extraction
    /// lowercases nouns, while country adjectives keep their capitals.
    fn normalize(word: &str) -> String {
        word.nfc().collect()
    }

    // -- construction -------------------------------------------------------

    /// Append a noun sense. Exact duplicates are dropped.
    pub fn add_noun(&mut self, word: impl AsRef<str>, sense: NounSense) {
        let senses = self
            .nouns
            .entry(Self::normalize(word.as_ref()))
            .or_default();
        if !senses.contains(&sense) {
            senses.push(sense);
        }
    }

    /// Append a noun sense under both the singular and its plural form.
    pub fn add_noun_with_plural(&mut self, word: impl AsRef<str>, sense: NounSense) {
        let word = word.as_ref();
        self.add_noun(word, sense.clone());
        self.add_noun(morph::plural_noun(word), sense);
    }

    /// Append an adjective sense. Exact duplicates are dropped.
    pub fn add_adjective(&mut self, word: impl AsRef<str>, sense: AdjSense) {
        let senses = self
            .adjectives
            .entry(Self::normalize(word.as_ref()))
            .or_default();
        if !senses.contains(&sense) {
            senses.push(sense);
        }
    }

    /// Append an adjective attachment rule. Exact duplicates are dropped.
    pub fn add_adjective_rule(&mut self, rule: AdjectiveRule) {
        if !self.adjective_rules.contains(&rule) {
            self.adjective_rules.push(rule);
        }
    }

    /// Register a relational-noun template. The first registration for a
    /// head wins; later ones are additions elsewhere, never replacements.
    pub fn add_relational(&mut self, noun: RelationalNoun) {
        self.relational.entry(noun.head.clone()).or_insert(noun);
    }

    pub fn add_type_name(&mut self, ty: impl Into<TypeId>, name: impl Into<String>) {
        self.type_names.insert(ty.into(), name.into());
    }

    pub fn add_property_name(&mut self, property: impl Into<String>, name: impl Into<String>) {
        self.property_names.insert(property.into(), name.into());
    }

    pub fn predicates_mut(&mut self) -> &mut PredicateTable {
        &mut self.predicates
    }

    // -- lookup -------------------------------------------------------------

    /// Senses of a noun; unknown words have no senses (not an error).
    pub fn noun_senses(&self, word: &str) -> &[NounSense] {
        self.nouns
            .get(&Self::normalize(word))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Senses of an adjective; unknown words have no senses.
    pub fn adjective_senses(&self, word: &str) -> &[AdjSense] {
        self.adjectives
            .get(&Self::normalize(word))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn adjective_rules(&self) -> &[AdjectiveRule] {
        &self.adjective_rules
    }

    pub fn relational(&self, head: &str) -> Option<&RelationalNoun> {
        self.relational.get(head)
    }

    pub fn predicates(&self) -> &PredicateTable {
        &self.predicates
    }

    /// Canonical English label for a type, falling back to the raw id for
    /// types the extraction left unnamed.
    pub fn type_name<'a>(&'a self, ty: &'a TypeId) -> &'a str {
        self.type_names
            .get(ty)
            .map(String::as_str)
            .unwrap_or(ty.as_str())
    }

    /// English gloss for a property path segment, falling back to the id.
    pub fn property_name<'a>(&'a self, property: &'a str) -> &'a str {
        self.property_names
            .get(property)
            .map(String::as_str)
            .unwrap_or(property)
    }

    pub fn noun_count(&self) -> usize {
        self.nouns.len()
    }

    pub fn adjective_count(&self) -> usize {
        self.adjectives.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    // -- grammar regeneration ----------------------------------------------

    /// Regenerate the terminal grammar rules for the external parser, so
    /// every lexicon word is reachable by it.
    ///
    /// The format is the parser generator's CFG text: one alternation per
    /// category, words single-quoted and sorted.
    pub fn grammar_rules(&self) -> String {
        let mut out = String::new();
        let sections: [(&str, BTreeSet<&str>); 3] = [
            ("N", self.nouns.keys().map(String::as_str).collect()),
            ("A", self.adjectives.keys().map(String::as_str).collect()),
            ("P", self.predicates.surface_words().collect()),
        ];
        for (cat, words) in sections {
            out.push_str(&format!("# ===== Auto-Generated {cat} Grammar Rules =====\n"));
            out.push_str(&format!("{cat} ->"));
            let quoted: Vec<String> = words.iter().map(|w| format!("'{w}'")).collect();
            out.push_str(&quoted.join(" | "));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noun_senses_dedup() {
        let mut lex = Lexicon::new();
        lex.add_noun("book", NounSense::typed("/book/book"));
        lex.add_noun("book", NounSense::typed("/book/book"));
        assert_eq!(lex.noun_senses("book").len(), 1);
    }

    #[test]
    fn overrides_append_new_senses() {
        let mut lex = Lexicon::new();
        lex.add_noun("actor", NounSense::typed("/film/actor"));
        lex.add_noun("actor", NounSense::typed("/tv/actor"));
        assert_eq!(lex.noun_senses("actor").len(), 2);
    }

    #[test]
    fn plural_registration_covers_both_forms() {
        let mut lex = Lexicon::new();
        lex.add_noun_with_plural("album", NounSense::typed("/music/album"));
        assert_eq!(lex.noun_senses("album").len(), 1);
        assert_eq!(lex.noun_senses("albums").len(), 1);
    }

    #[test]
    fn unknown_words_have_no_senses() {
        let lex = Lexicon::new();
        assert!(lex.noun_senses("zyzzyva").is_empty());
        assert!(lex.adjective_senses("zyzzyvan").is_empty());
    }

    #[test]
    fn adjective_lookup_is_case_sensitive() {
        let mut lex = Lexicon::new();
        lex.add_adjective(
            "Canadian",
            AdjSense::entity("/location/country", "/m/0d060g"),
        );
        assert_eq!(lex.adjective_senses("Canadian").len(), 1);
        assert!(lex.adjective_senses("canadian").is_empty());
    }

    #[test]
    fn type_name_falls_back_to_id() {
        let mut lex = Lexicon::new();
        lex.add_type_name("/people/person", "person");
        let person = TypeId::from("/people/person");
        let unnamed = TypeId::from("/x/unnamed");
        assert_eq!(lex.type_name(&person), "person");
        assert_eq!(lex.type_name(&unnamed), "/x/unnamed");
    }

    #[test]
    fn grammar_rules_quote_and_sort() {
        let mut lex = Lexicon::new();
        lex.add_noun("book", NounSense::typed("/book/book"));
        lex.add_noun("album", NounSense::typed("/music/album"));
        lex.predicates_mut()
            .add_lexicalization("CreatedBy", Lexicalization::prep("by"));
        let rules = lex.grammar_rules();
        assert!(rules.contains("N ->'album' | 'book'"));
        assert!(rules.contains("P ->'by'"));
    }
}
