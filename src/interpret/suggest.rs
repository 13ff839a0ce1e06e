//! Relation suggestions for underspecified queries.
//!
//! When the relation slot between two phrases is filled by the generic
//! marker rather than a concrete preposition, the interpreter cannot pick a
//! relation — but it can report which relations *would* connect the two
//! phrases. Each compatible predicate sense contributes one suggestion;
//! duplicates are collapsed, and the list is capped like the ranker's cut,
//! with the same 1% tie tolerance at the boundary.

use std::collections::HashSet;

use crate::lexicon::predicate::{ConceptualPredicate, PredicateSense};
use crate::lexicon::Lexicon;

/// Relations through the catch-all "topic" type are rated slightly worse:
/// they connect almost anything and rarely say what the user meant.
pub const TOPIC_DEMOTION: f64 = 0.99;

/// One suggested relation between the two surrounding phrases.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub fit: f64,
    /// English label of the sense's subject type.
    pub subject: String,
    /// Canonical surface form of the predicate.
    pub relation: String,
    /// English label of the sense's object type.
    pub object: String,
}

impl Suggestion {
    /// The deduplication key and display body: `subject 'relation' object`.
    pub fn rendered(&self) -> String {
        format!("{} '{}' {}", self.subject, self.relation, self.object)
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(fit={:.2}) {}", self.fit, self.rendered())
    }
}

/// Build the suggestion for one compatible sense of a predicate.
///
/// `fit` is the composed meaning's fit for this sense; senses touching the
/// "topic" type are demoted by [`TOPIC_DEMOTION`].
pub fn from_sense(
    lexicon: &Lexicon,
    predicate: &ConceptualPredicate,
    sense: &PredicateSense,
    fit: f64,
) -> Suggestion {
    let subject = lexicon.type_name(&sense.subject).to_string();
    let object = lexicon.type_name(&sense.object).to_string();
    let fit = if subject == "topic" || object == "topic" {
        fit * TOPIC_DEMOTION
    } else {
        fit
    };
    Suggestion {
        fit,
        subject,
        relation: predicate.canonical_word().unwrap_or("?").to_string(),
        object,
    }
}

/// Sort, deduplicate, and cap the collected suggestions.
///
/// Order: descending fit, then lowercase relation labels first, then
/// relation, then subject, then combined label length (shorter first).
/// The cap extends past `limit` while trailing entries stay within 1% of
/// the best fit.
pub fn finalize(mut suggestions: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        b.fit
            .partial_cmp(&a.fit)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| has_uppercase(&a.relation).cmp(&has_uppercase(&b.relation)))
            .then_with(|| a.relation.cmp(&b.relation))
            .then_with(|| a.subject.cmp(&b.subject))
            .then_with(|| combined_len(a).cmp(&combined_len(b)))
    });

    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.rendered()));

    if suggestions.len() > limit {
        let top = suggestions[0].fit;
        let mut cutoff = limit;
        while cutoff < suggestions.len()
            && suggestions[cutoff].fit > top * super::ranker::TIE_TOLERANCE
        {
            cutoff += 1;
        }
        suggestions.truncate(cutoff);
    }
    suggestions
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}

fn combined_len(s: &Suggestion) -> usize {
    s.subject.len() + s.relation.len() + s.object.len()
}
