//! Extraction packs: the file format of the external schema extraction.
//!
//! A pack is a TOML bundle of lookup tables fetched from the knowledge
//! graph's schema: type and property display names, pairwise
//! type-intersection counts, noun and adjective tables, and the relation
//! metaschema grouped into conceptual predicates. One base pack is bundled
//! into the binary; further packs can be loaded from a directory and are
//! applied in sorted filename order, after the base pack and before the
//! hand-authored overrides.

use std::path::Path;

use serde::Deserialize;

use crate::compat::{CompatibilityMatrix, IntersectionEntry};
use crate::error::LexiconError;
use crate::typeset::TypeId;

use super::predicate::{Lexicalization, PredicateSense};
use super::{AdjSense, Lexicon, NounSense};

/// The bundled base extraction snapshot.
const BASE_PACK_TOML: &str = include_str!("../../data/packs/base/pack.toml");

/// Pack-level metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PackMeta {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// `[[types]]` — type id → canonical English label.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeEntry {
    pub id: TypeId,
    pub name: String,
}

/// `[[properties]]` — property id → English gloss.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyEntry {
    pub id: String,
    pub name: String,
}

/// `[[nouns]]` — an English noun and the types it can denote. An empty type
/// list registers the unconstrained sense ("thing").
#[derive(Debug, Clone, Deserialize)]
pub struct NounEntry {
    pub word: String,
    #[serde(default)]
    pub types: Vec<TypeId>,
    /// Also register the automatically derived plural form.
    #[serde(default)]
    pub pluralize: bool,
}

/// `[[adjectives]]` — an adjective (plus spelling variants) referencing a
/// fixed entity of the given type.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjectiveEntry {
    pub word: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(rename = "type")]
    pub ty: TypeId,
    pub entity: String,
}

/// `[[predicates]]` — one conceptual relation from the metaschema.
#[derive(Debug, Clone, Deserialize)]
pub struct PredicateEntry {
    pub key: String,
    pub lexicalizations: Vec<Lexicalization>,
    #[serde(default)]
    pub senses: Vec<PredicateSense>,
}

/// A parsed extraction pack.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionPack {
    pub pack: PackMeta,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
    #[serde(default)]
    pub intersections: Vec<IntersectionEntry>,
    #[serde(default)]
    pub nouns: Vec<NounEntry>,
    #[serde(default)]
    pub adjectives: Vec<AdjectiveEntry>,
    #[serde(default)]
    pub predicates: Vec<PredicateEntry>,
}

impl ExtractionPack {
    /// Parse a pack from TOML text. `origin` names the source in diagnostics.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, LexiconError> {
        toml::from_str(text).map_err(|e| LexiconError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load a pack from a TOML file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// The base pack bundled into the binary.
    pub fn bundled_base() -> Result<Self, LexiconError> {
        Self::from_toml_str(BASE_PACK_TOML, "<bundled base pack>")
    }

    /// Apply this pack's tables to a lexicon and matrix under construction.
    pub fn apply(
        &self,
        lexicon: &mut Lexicon,
        matrix: &mut CompatibilityMatrix,
    ) -> Result<(), LexiconError> {
        for ty in &self.types {
            lexicon.add_type_name(ty.id.clone(), ty.name.clone());
        }
        for prop in &self.properties {
            lexicon.add_property_name(prop.id.clone(), prop.name.clone());
        }
        matrix.extend(self.intersections.iter().cloned());

        for noun in &self.nouns {
            let senses: Vec<NounSense> = if noun.types.is_empty() {
                vec![NounSense::untyped()]
            } else {
                noun.types
                    .iter()
                    .map(|ty| NounSense::typed(ty.clone()))
                    .collect()
            };
            for sense in senses {
                if noun.pluralize {
                    lexicon.add_noun_with_plural(&noun.word, sense);
                } else {
                    lexicon.add_noun(&noun.word, sense);
                }
            }
        }

        for adj in &self.adjectives {
            let sense = AdjSense::entity(adj.ty.clone(), adj.entity.clone());
            lexicon.add_adjective(&adj.word, sense.clone());
            for alias in &adj.aliases {
                lexicon.add_adjective(alias, sense.clone());
            }
        }

        for pred in &self.predicates {
            for lex in &pred.lexicalizations {
                lexicon
                    .predicates_mut()
                    .add_lexicalization(&pred.key, lex.clone());
            }
            for sense in &pred.senses {
                lexicon.predicates_mut().add_sense(&pred.key, sense.clone())?;
            }
        }

        tracing::debug!(
            pack = %self.pack.id,
            nouns = self.nouns.len(),
            adjectives = self.adjectives.len(),
            predicates = self.predicates.len(),
            intersections = self.intersections.len(),
            "applied extraction pack"
        );
        Ok(())
    }
}

/// Load every `*.toml` pack in a directory, sorted by filename so the merge
/// order is reproducible.
pub fn load_dir(dir: &Path) -> Result<Vec<ExtractionPack>, LexiconError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LexiconError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut packs = Vec::new();
    for path in paths {
        packs.push(ExtractionPack::load(&path)?);
    }
    Ok(packs)
}
