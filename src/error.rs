//! Rich diagnostic error types for the seshat interpreter.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Note the deliberate asymmetry with the interpretation semantics: an
//! unrecognized syntax production is a hard error, but an unknown word, an
//! unknown type, or a type-incompatible candidate combination is *not* — those
//! resolve to zero senses or zero fit and simply produce fewer candidates.

use miette::Diagnostic;
use thiserror::Error;

use crate::syntax::Cat;

/// Top-level error type for the seshat engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SeshatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Syntax-tree errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("unbalanced parentheses in syntax tree at offset {offset}")]
    #[diagnostic(
        code(seshat::syntax::unbalanced),
        help(
            "The bracketed tree has a missing or extra parenthesis. \
             Trees look like `(NBar (N author) (OF of) (DP Tolkien))`."
        )
    )]
    Unbalanced { offset: usize },

    #[error("unknown syntactic category: \"{label}\"")]
    #[diagnostic(
        code(seshat::syntax::unknown_category),
        help(
            "Valid categories are DP, NP, NBar, N, A, P, Det, OF, LBR, RBR. \
             Check the grammar the external parser was generated from."
        )
    )]
    UnknownCategory { label: String },

    #[error("empty syntax tree")]
    #[diagnostic(
        code(seshat::syntax::empty),
        help("The tree text contained no node. Pass at least one `(CAT ...)` form.")
    )]
    Empty,
}

// ---------------------------------------------------------------------------
// Lexicon errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LexiconError {
    #[error("failed to read extraction pack: {path}")]
    #[diagnostic(
        code(seshat::lexicon::io),
        help("Ensure the pack file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse extraction pack \"{path}\": {message}")]
    #[diagnostic(
        code(seshat::lexicon::parse),
        help("Check the pack TOML syntax against data/packs/base/pack.toml.")
    )]
    Parse { path: String, message: String },

    #[error("predicate sense added to unknown predicate: \"{key}\"")]
    #[diagnostic(
        code(seshat::lexicon::unknown_predicate),
        help(
            "Senses may only be appended to an existing conceptual predicate. \
             Register the predicate with at least one lexicalization first."
        )
    )]
    UnknownPredicate { key: String },
}

// ---------------------------------------------------------------------------
// Interpretation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InterpretError {
    #[error("unsupported {cat} production: ({cat} {shape})")]
    #[diagnostic(
        code(seshat::interpret::unsupported_production),
        help(
            "The syntax tree contains a child shape no interpretation rule \
             covers. The interpreter handles the noun-phrase grammar only: \
             determiner phrases, adjective modifiers, noun compounds, \
             relational `N of DP`, and `NBar P DP` modifiers."
        )
    )]
    UnsupportedProduction { cat: Cat, shape: String },

    #[error("cannot interpret {shape} as a phrase root")]
    #[diagnostic(
        code(seshat::interpret::unsupported_root),
        help(
            "Interpretation starts from a phrase node: DP (the grammar's \
             start symbol), NP, NBar, or a terminal N or A."
        )
    )]
    UnsupportedRoot { shape: String },

    #[error("terminal {cat} node has no word")]
    #[diagnostic(
        code(seshat::interpret::missing_word),
        help(
            "Terminal categories (N, A, P, Det, OF) must contain exactly one \
             word leaf, e.g. `(N author)`."
        )
    )]
    MissingWord { cat: Cat },
}

// ---------------------------------------------------------------------------
// Query-fragment errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("unfilled template slot under field \"{field}\"")]
    #[diagnostic(
        code(seshat::query::unfilled_slot),
        help(
            "A lexicon template reached wire serialization with its object \
             hole still open. Templates must be completed with `Fragment::fill` \
             before the fragment leaves the interpreter."
        )
    )]
    UnfilledSlot { field: String },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(seshat::engine::invalid_config),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },

    #[error("extraction pack directory error: {path}")]
    #[diagnostic(
        code(seshat::engine::pack_dir),
        help(
            "The pack directory could not be read. \
             Ensure the path exists and has read permissions."
        )
    )]
    PackDir { path: String },
}

/// Convenience alias for functions returning seshat results.
pub type SeshatResult<T> = std::result::Result<T, SeshatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_converts_to_seshat_error() {
        let err = SyntaxError::UnknownCategory {
            label: "VP".into(),
        };
        let top: SeshatError = err.into();
        assert!(matches!(
            top,
            SeshatError::Syntax(SyntaxError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn interpret_error_converts_to_seshat_error() {
        let err = InterpretError::MissingWord { cat: Cat::Noun };
        let top: SeshatError = err.into();
        assert!(matches!(
            top,
            SeshatError::Interpret(InterpretError::MissingWord { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = InterpretError::UnsupportedProduction {
            cat: Cat::NBar,
            shape: "Det Det".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("NBar"));
        assert!(msg.contains("Det Det"));
    }
}
