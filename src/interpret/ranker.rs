//! Disambiguation ranking: keep the best few candidates at every
//! composition step.
//!
//! Without this cut the candidate cross-product grows combinatorially with
//! phrase length, so pruning here is load-bearing architecture, not an
//! optimization. The cut is fit-ordered with a relative tie band: a meaning
//! within 1% of the Nth-best is kept, so near-equal readings (an exact name
//! and its alias, say) are never split arbitrarily.

use super::meaning::TypedMeaning;

/// A fit within this relative factor of the Nth-best counts as a tie.
pub const TIE_TOLERANCE: f64 = 0.99;

/// Return the `n` best-fitting meanings, plus any tied with the Nth.
///
/// Sets `made_cuts` when candidates were actually dropped, signalling that
/// re-running with a larger `n` could change the result.
pub fn best(n: usize, mut meanings: Vec<TypedMeaning>, made_cuts: &mut bool) -> Vec<TypedMeaning> {
    meanings.sort_by(|a, b| {
        b.fit
            .partial_cmp(&a.fit)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if meanings.len() <= n {
        return meanings;
    }

    let threshold = meanings[n - 1].fit;
    let mut cutoff = n;
    while cutoff < meanings.len() && meanings[cutoff].fit > threshold * TIE_TOLERANCE {
        cutoff += 1;
    }
    if cutoff < meanings.len() {
        *made_cuts = true;
        tracing::debug!(
            kept = cutoff,
            dropped = meanings.len() - cutoff,
            "pruned candidate meanings"
        );
    }
    meanings.truncate(cutoff);
    meanings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Fragment;
    use crate::typeset::TypeSet;

    fn meanings(fits: &[f64]) -> Vec<TypedMeaning> {
        fits.iter()
            .map(|&fit| TypedMeaning::new(TypeSet::empty(), Fragment::new()).with_fit(fit))
            .collect()
    }

    #[test]
    fn fewer_than_n_returns_all() {
        let mut cuts = false;
        let kept = best(10, meanings(&[0.5, 0.9]), &mut cuts);
        assert_eq!(kept.len(), 2);
        assert!(!cuts);
    }

    #[test]
    fn returns_sorted_descending() {
        let mut cuts = false;
        let kept = best(10, meanings(&[0.5, 0.9, 0.7]), &mut cuts);
        let fits: Vec<f64> = kept.iter().map(|m| m.fit).collect();
        assert_eq!(fits, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn cuts_beyond_n_and_sets_flag() {
        let mut cuts = false;
        let kept = best(2, meanings(&[0.9, 0.8, 0.5, 0.4]), &mut cuts);
        assert_eq!(kept.len(), 2);
        assert!(cuts);
    }

    #[test]
    fn near_ties_with_nth_survive() {
        let mut cuts = false;
        // 0.796 is within 1% of 0.8, 0.7 is not.
        let kept = best(2, meanings(&[0.9, 0.8, 0.796, 0.7]), &mut cuts);
        assert_eq!(kept.len(), 3);
        assert!(cuts);
    }

    #[test]
    fn exact_and_alias_name_readings_never_split() {
        use super::super::meaning::{ALIAS_FIT, EXACT_NAME_FIT};
        let mut cuts = false;
        let kept = best(1, meanings(&[EXACT_NAME_FIT, ALIAS_FIT]), &mut cuts);
        assert_eq!(kept.len(), 2);
        assert!(!cuts);
    }

    #[test]
    fn no_flag_when_tie_band_reaches_the_end() {
        let mut cuts = false;
        let kept = best(1, meanings(&[0.9, 0.899, 0.898]), &mut cuts);
        assert_eq!(kept.len(), 3);
        assert!(!cuts);
    }
}
