//! # seshat
//!
//! A semantic interpreter that resolves ambiguous natural-language noun
//! phrases into typed, scored structured queries against a knowledge graph.
//!
//! ## Architecture
//!
//! ```text
//! Syntax Tree ──→ Interpreter ──→ TypedMeanings ──→ wire queries (JSON)
//!                  │    │   │
//!            Lexicon    │   CompatibilityMatrix
//!     PredicateTable    │
//!                       Ranker (prunes at every composition step)
//! ```
//!
//! - **Type compatibility** (`compat`): pairwise intersection-count matrix
//!   and the fit-scoring function over conjunctive type sets
//! - **Lexicon** (`lexicon`): typed word senses, relational-noun templates,
//!   and the conceptual-predicate table, built from extraction packs plus
//!   hand-authored overrides
//! - **Interpretation** (`interpret`): recursive composition over the
//!   parser's syntax tree, with per-step pruning and relation suggestions
//! - **Query fragments** (`query`): an explicit constraint-tree AST,
//!   serialized to the backend's wire dialect only at the boundary
//!
//! ## Library usage
//!
//! ```no_run
//! use seshat::engine::{Engine, EngineConfig};
//! use seshat::syntax::SynTree;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let tree = SynTree::from_sexpr("(DP Canada)").unwrap();
//! let outcome = engine.interpret(&tree).unwrap();
//! for meaning in &outcome.meanings {
//!     println!("fit={:.3} {}", meaning.fit, meaning.fragment);
//! }
//! ```

pub mod compat;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod lexicon;
pub mod query;
pub mod syntax;
pub mod typeset;
