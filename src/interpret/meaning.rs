//! Candidate meanings of a phrase.

use crate::query::Fragment;
use crate::typeset::TypeSet;

/// Fit of an exact name-field match.
pub const EXACT_NAME_FIT: f64 = 1.0;
/// Alias matches score a tad below exact, close enough to survive the
/// ranker's tie band together with the exact reading.
pub const ALIAS_FIT: f64 = 1.0 - 1e-6;
/// Whole-word containment in the name field (fuzzy mode only).
pub const FUZZY_NAME_FIT: f64 = 1.0 - 1e-4;
/// Whole-word containment in an alias (fuzzy mode only, least preferred).
pub const FUZZY_ALIAS_FIT: f64 = 1.0 - 1e-2;

/// One possible interpretation of a syntax-tree node: the joint type
/// constraint it imposes, the query fragment it denotes, the relational
/// head label (if the phrase is headed by a relational noun awaiting an
/// object), and how good a fit this reading is.
///
/// Fits are relative scores, not probabilities. Composition multiplies
/// contributing fits and compatibility factors, all in `[0, 1]`, so a
/// composed meaning never scores above what any of its parts allow.
#[derive(Debug, Clone)]
pub struct TypedMeaning {
    pub types: TypeSet,
    pub fragment: Fragment,
    pub head: Option<String>,
    pub fit: f64,
}

impl TypedMeaning {
    /// A meaning with fit 1 and no relational head.
    pub fn new(types: TypeSet, fragment: Fragment) -> Self {
        Self {
            types,
            fragment,
            head: None,
            fit: 1.0,
        }
    }

    pub fn with_fit(mut self, fit: f64) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_head(mut self, head: Option<String>) -> Self {
        self.head = head;
        self
    }
}
