//! Engine facade: top-level API for the seshat interpreter.
//!
//! The `Engine` builds the immutable lexicon and compatibility matrix once
//! at startup and hands out interpretations. The tables live behind `Arc`
//! and are never mutated after construction, so one engine may serve
//! concurrent interpretation requests; all per-request state stays inside
//! each [`interpret`](crate::interpret) call.

use std::path::PathBuf;
use std::sync::Arc;

use crate::compat::CompatibilityMatrix;
use crate::error::{EngineError, SeshatResult};
use crate::interpret::{Interpretation, Interpreter, InterpreterConfig};
use crate::lexicon::{overrides, pack, ExtractionPack, Lexicon};
use crate::syntax::SynTree;

/// Configuration for the seshat engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many candidate meanings survive each composition step (ties
    /// included).
    pub accuracy: usize,
    /// Enable whole-word name/alias matching for literal names. Loose by
    /// design; off by default.
    pub fuzzy_names: bool,
    /// Cap on reported relation suggestions.
    pub suggestion_limit: usize,
    /// Directory of additional extraction packs, applied after the bundled
    /// base pack in sorted filename order. `None` for the bundled pack only.
    pub pack_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accuracy: 10,
            fuzzy_names: false,
            suggestion_limit: 20,
            pack_dir: None,
        }
    }
}

/// The seshat semantic interpretation engine.
///
/// Owns the read-only tables: the lexicon (word senses, relational
/// templates, predicates) and the type-compatibility matrix.
pub struct Engine {
    config: EngineConfig,
    lexicon: Arc<Lexicon>,
    matrix: Arc<CompatibilityMatrix>,
}

impl Engine {
    /// Build an engine from the bundled base pack, optional external packs,
    /// and the hand-authored overrides — in that fixed order.
    pub fn new(config: EngineConfig) -> SeshatResult<Self> {
        Self::validate(&config)?;

        let mut lexicon = Lexicon::new();
        let mut matrix = CompatibilityMatrix::new();

        ExtractionPack::bundled_base()?.apply(&mut lexicon, &mut matrix)?;
        if let Some(dir) = &config.pack_dir {
            let packs = pack::load_dir(dir).map_err(|e| {
                tracing::warn!(path = %dir.display(), error = %e, "failed to read pack directory");
                EngineError::PackDir {
                    path: dir.display().to_string(),
                }
            })?;
            for extra in packs {
                extra.apply(&mut lexicon, &mut matrix)?;
            }
        }
        overrides::apply(&mut lexicon)?;

        tracing::info!(
            nouns = lexicon.noun_count(),
            adjectives = lexicon.adjective_count(),
            predicates = lexicon.predicate_count(),
            types = matrix.type_count(),
            "initialized seshat engine"
        );

        Ok(Self {
            config,
            lexicon: Arc::new(lexicon),
            matrix: Arc::new(matrix),
        })
    }

    /// Build an engine over already-constructed tables (tests, embedders).
    pub fn from_parts(
        lexicon: Lexicon,
        matrix: CompatibilityMatrix,
        config: EngineConfig,
    ) -> SeshatResult<Self> {
        Self::validate(&config)?;
        Ok(Self {
            config,
            lexicon: Arc::new(lexicon),
            matrix: Arc::new(matrix),
        })
    }

    fn validate(config: &EngineConfig) -> Result<(), EngineError> {
        if config.accuracy == 0 {
            return Err(EngineError::InvalidConfig {
                message: "accuracy must be >= 1".into(),
            });
        }
        if config.suggestion_limit == 0 {
            return Err(EngineError::InvalidConfig {
                message: "suggestion_limit must be >= 1".into(),
            });
        }
        Ok(())
    }

    /// Interpret a syntax tree into ranked candidate meanings.
    pub fn interpret(&self, tree: &SynTree) -> SeshatResult<Interpretation> {
        let interpreter = Interpreter::new(
            &self.lexicon,
            &self.matrix,
            InterpreterConfig {
                accuracy: self.config.accuracy,
                fuzzy_names: self.config.fuzzy_names,
                suggestion_limit: self.config.suggestion_limit,
            },
        );
        Ok(interpreter.interpret(tree)?)
    }

    /// Parse a bracketed tree and interpret it.
    pub fn interpret_sexpr(&self, text: &str) -> SeshatResult<Interpretation> {
        let tree = SynTree::from_sexpr(text)?;
        self.interpret(&tree)
    }

    /// Regenerated terminal grammar rules for the external parser.
    pub fn grammar_rules(&self) -> String {
        self.lexicon.grammar_rules()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Summary statistics about the loaded tables.
    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            nouns: self.lexicon.noun_count(),
            adjectives: self.lexicon.adjective_count(),
            predicates: self.lexicon.predicate_count(),
            types: self.matrix.type_count(),
            accuracy: self.config.accuracy,
            fuzzy_names: self.config.fuzzy_names,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("nouns", &self.lexicon.noun_count())
            .field("predicates", &self.lexicon.predicate_count())
            .finish()
    }
}

/// Summary information about the engine state.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub nouns: usize,
    pub adjectives: usize,
    pub predicates: usize,
    pub types: usize,
    pub accuracy: usize,
    pub fuzzy_names: bool,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "seshat engine info")?;
        writeln!(f, "  nouns:        {}", self.nouns)?;
        writeln!(f, "  adjectives:   {}", self.adjectives)?;
        writeln!(f, "  predicates:   {}", self.predicates)?;
        writeln!(f, "  types:        {}", self.types)?;
        writeln!(f, "  accuracy:     {}", self.accuracy)?;
        writeln!(f, "  fuzzy names:  {}", self.fuzzy_names)?;
        Ok(())
    }
}
