//! Conceptual predicates and their typed senses.
//!
//! A conceptual predicate groups everything the system knows about one
//! semantic relation: the surface words that can express it ("by",
//! "written by", "concerns") and the concrete knowledge-graph realizations
//! of it. One realization — a [`PredicateSense`] — pins the subject type,
//! the object type, and the property path to traverse between them.
//!
//! For example the predicate `CreatedBy` may carry the senses
//! "written work → author via /book/written_work/author" and
//! "film → director via /film/film/directed_by"; which one applies is
//! decided later by type compatibility with the surrounding phrases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::typeset::TypeId;

/// Syntactic category of a predicate surface form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceCat {
    #[serde(rename = "P")]
    Preposition,
    #[serde(rename = "V")]
    Verb,
}

/// One surface word expressing a conceptual predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicalization {
    pub cat: SurfaceCat,
    pub word: String,
}

impl Lexicalization {
    pub fn prep(word: impl Into<String>) -> Self {
        Self {
            cat: SurfaceCat::Preposition,
            word: word.into(),
        }
    }

    pub fn verb(word: impl Into<String>) -> Self {
        Self {
            cat: SurfaceCat::Verb,
            word: word.into(),
        }
    }
}

/// One concrete realization of a conceptual predicate: subjects of
/// `subject` type reach objects of `object` type by traversing `path`.
///
/// A path segment may carry the `!` reversed-traversal marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateSense {
    pub subject: TypeId,
    pub object: TypeId,
    pub path: Vec<String>,
}

impl PredicateSense {
    pub fn new(
        subject: impl Into<TypeId>,
        object: impl Into<TypeId>,
        path: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

/// A semantic relation with all its surface forms and typed senses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptualPredicate {
    pub lexicalizations: Vec<Lexicalization>,
    pub senses: Vec<PredicateSense>,
}

impl ConceptualPredicate {
    /// Whether any surface form matches `word` (any category).
    pub fn expressed_by(&self, word: &str) -> bool {
        self.lexicalizations.iter().any(|lex| lex.word == word)
    }

    /// The canonical surface form: the first lexicalization registered.
    pub fn canonical_word(&self) -> Option<&str> {
        self.lexicalizations.first().map(|lex| lex.word.as_str())
    }
}

/// The predicate table: conceptual relation key → predicate.
///
/// Sorted keys keep enumeration order (and therefore suggestion output)
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct PredicateTable {
    entries: BTreeMap<String, ConceptualPredicate>,
}

impl PredicateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConceptualPredicate> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConceptualPredicate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Register a surface form for a predicate, creating the predicate on
    /// first mention. Exact duplicates are dropped.
    pub fn add_lexicalization(&mut self, key: impl Into<String>, lex: Lexicalization) {
        let pred = self.entries.entry(key.into()).or_default();
        if !pred.lexicalizations.contains(&lex) {
            pred.lexicalizations.push(lex);
        }
    }

    /// Append a sense to an existing predicate. Exact duplicates are
    /// dropped; the predicate must already have been registered.
    pub fn add_sense(
        &mut self,
        key: &str,
        sense: PredicateSense,
    ) -> Result<(), crate::error::LexiconError> {
        let pred = self
            .entries
            .get_mut(key)
            .ok_or_else(|| crate::error::LexiconError::UnknownPredicate {
                key: key.to_string(),
            })?;
        if !pred.senses.contains(&sense) {
            pred.senses.push(sense);
        }
        Ok(())
    }

    /// All surface words across all predicates, for grammar-rule
    /// regeneration.
    pub fn surface_words(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .flat_map(|p| p.lexicalizations.iter())
            .map(|lex| lex.word.as_str())
    }
}
