//! Type-compatibility scoring over pairwise intersection counts.
//!
//! The [`CompatibilityMatrix`] holds, for ordered pairs of types, an estimated
//! count of entities belonging to both. It is produced by the external schema
//! extraction step and is read-only here. [`CompatibilityMatrix::compatible`]
//! turns those counts into a relative "fit" score for combining two
//! conjunctive type constraints.
//!
//! The score answers: given that an entity already satisfies one constraint,
//! how plausible is it that it also satisfies the other? `top / bottom`
//! measures how much the combined constraint narrows the population relative
//! to the more permissive input; the `1 / bottom^0.2` exponent biases the
//! score toward 1.0 as the denominator grows, so a conjunction of two broad,
//! well-populated categories is not mistaken for a tight combination just
//! because the raw ratio is favorable.

use std::collections::HashMap;

use serde::Deserialize;

use crate::typeset::{TypeId, TypeSet};

/// Estimate used for the empty (unconstrained) type set, and the seed for the
/// running minimum. One billion, comfortably above any real instance count.
pub const UNCONSTRAINED_ESTIMATE: u64 = 1_000_000_000;

/// One `(a, b) -> count` entry in an extraction pack.
#[derive(Debug, Clone, Deserialize)]
pub struct IntersectionEntry {
    pub a: TypeId,
    pub b: TypeId,
    pub count: u64,
}

/// Pairwise type-intersection counts from the schema extraction step.
///
/// Absent types and absent pairs are treated as zero: an unknown type can
/// never participate in a consistent constraint. Diagonal entries `(t, t)`
/// are the per-type instance counts.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    counts: HashMap<TypeId, HashMap<TypeId, u64>>,
}

impl CompatibilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symmetric pair entry (both orders).
    pub fn insert(&mut self, a: impl Into<TypeId>, b: impl Into<TypeId>, count: u64) {
        let (a, b) = (a.into(), b.into());
        self.counts
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), count);
        self.counts.entry(b).or_default().insert(a, count);
    }

    /// Build a matrix from extraction-pack entries.
    pub fn from_entries(entries: impl IntoIterator<Item = IntersectionEntry>) -> Self {
        let mut matrix = Self::new();
        for entry in entries {
            matrix.insert(entry.a, entry.b, entry.count);
        }
        matrix
    }

    /// Merge another pack's entries into this matrix. Later entries win on
    /// duplicate pairs (a refreshed extraction supersedes a stale one).
    pub fn extend(&mut self, entries: impl IntoIterator<Item = IntersectionEntry>) {
        for entry in entries {
            self.insert(entry.a, entry.b, entry.count);
        }
    }

    /// Number of types with at least one pair entry.
    pub fn type_count(&self) -> usize {
        self.counts.len()
    }

    /// The raw count for an ordered pair, if present.
    pub fn pair(&self, a: &TypeId, b: &TypeId) -> Option<u64> {
        self.counts.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Estimated population of entities satisfying every type in `types`:
    /// the minimum over all ordered pairs drawn from the set.
    ///
    /// Zero when any member type is unknown or any pair entry is absent —
    /// an internally inconsistent or unextracted constraint supports nothing.
    /// The empty set estimates to [`UNCONSTRAINED_ESTIMATE`].
    pub fn estimate(&self, types: &TypeSet) -> u64 {
        let mut running_min = UNCONSTRAINED_ESTIMATE;
        for t1 in types.iter() {
            let Some(row) = self.counts.get(t1) else {
                return 0;
            };
            for t2 in types.iter() {
                let Some(&count) = row.get(t2) else {
                    return 0;
                };
                running_min = running_min.min(count);
            }
        }
        running_min
    }

    /// Fit score for combining two conjunctive constraints.
    ///
    /// ```text
    /// top    = estimate(t1 ∪ t2)
    /// bottom = min(estimate(t1), estimate(t2))
    /// fit    = (top / bottom) ^ (1 / bottom^0.2)      (0 when bottom is 0)
    /// ```
    ///
    /// Commutative, non-negative, and exactly 0 whenever either input is
    /// internally inconsistent. Exactly 1 when the union narrows nothing.
    pub fn compatible(&self, t1: &TypeSet, t2: &TypeSet) -> f64 {
        let top = self.estimate(&t1.union(t2));
        let bottom = self.estimate(t1).min(self.estimate(t2));
        if bottom == 0 {
            return 0.0;
        }
        let ratio = top as f64 / bottom as f64;
        ratio.powf(1.0 / (bottom as f64).powf(0.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> CompatibilityMatrix {
        let mut m = CompatibilityMatrix::new();
        m.insert("/people/person", "/people/person", 3_000_000);
        m.insert("/book/author", "/book/author", 180_000);
        m.insert("/people/person", "/book/author", 175_000);
        m.insert("/location/country", "/location/country", 700);
        // Countries are never people.
        m.insert("/people/person", "/location/country", 0);
        m
    }

    fn set(ids: &[&str]) -> TypeSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn empty_set_estimates_to_sentinel() {
        let m = matrix();
        assert_eq!(m.estimate(&TypeSet::empty()), UNCONSTRAINED_ESTIMATE);
    }

    #[test]
    fn unknown_type_estimates_to_zero() {
        let m = matrix();
        assert_eq!(m.estimate(&set(&["/music/album"])), 0);
    }

    #[test]
    fn missing_pair_estimates_to_zero() {
        let mut m = matrix();
        m.counts
            .entry(TypeId::from("/film/film"))
            .or_default()
            .insert(TypeId::from("/film/film"), 250_000);
        // No (/film/film, /people/person) entry in either order.
        assert_eq!(m.estimate(&set(&["/film/film", "/people/person"])), 0);
    }

    #[test]
    fn compatible_is_commutative() {
        let m = matrix();
        let person = set(&["/people/person"]);
        let author = set(&["/book/author"]);
        assert_eq!(m.compatible(&person, &author), m.compatible(&author, &person));
    }

    #[test]
    fn compatible_is_non_negative_and_zero_on_inconsistency() {
        let m = matrix();
        let person = set(&["/people/person"]);
        let unknown = set(&["/music/album"]);
        assert_eq!(m.compatible(&person, &unknown), 0.0);
        assert!(m.compatible(&person, &set(&["/book/author"])) >= 0.0);
    }

    #[test]
    fn self_compatibility_is_one() {
        let m = matrix();
        let person = set(&["/people/person"]);
        assert_eq!(m.compatible(&person, &person), 1.0);
    }

    #[test]
    fn empty_set_never_zeroes_compatibility() {
        let m = matrix();
        let person = set(&["/people/person"]);
        assert_eq!(m.compatible(&TypeSet::empty(), &person), 1.0);
        assert_eq!(
            m.compatible(&TypeSet::empty(), &TypeSet::empty()),
            1.0
        );
    }

    #[test]
    fn disjoint_pair_scores_zero() {
        let m = matrix();
        let person = set(&["/people/person"]);
        let country = set(&["/location/country"]);
        // Pair entry exists but is 0, so the union estimates to 0.
        assert_eq!(m.compatible(&person, &country), 0.0);
    }

    #[test]
    fn narrowing_scores_below_one() {
        let m = matrix();
        let person = set(&["/people/person"]);
        let author = set(&["/book/author"]);
        let fit = m.compatible(&person, &author);
        // 175k of 180k authors are people: high fit, but not certainty.
        assert!(fit > 0.9 && fit < 1.0, "fit = {fit}");
    }

    #[test]
    fn large_denominator_biases_toward_one() {
        let mut m = CompatibilityMatrix::new();
        m.insert("/a", "/a", 100);
        m.insert("/b", "/b", 1_000_000);
        m.insert("/a", "/b", 50);
        m.insert("/c", "/c", 10);
        m.insert("/d", "/d", 100_000);
        m.insert("/c", "/d", 5);
        // Both pairs halve the narrower side, but the better-supported pair
        // (bottom 100 vs bottom 10) should score closer to 1.
        let broad = m.compatible(&set(&["/a"]), &set(&["/b"]));
        let narrow = m.compatible(&set(&["/c"]), &set(&["/d"]));
        assert!(broad > narrow, "broad {broad} narrow {narrow}");
    }
}
