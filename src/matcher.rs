//! Fuzzy correlation between the ranked list and the released episodes.
//!
//! For every ranked game the matcher scans all released names, keeps the
//! single best-scoring one, and accepts the pair when the score clears a
//! fixed threshold. A released name is never consumed: it may be the best
//! match for several ranked games at once (name variants make this routine).
//! Ties break toward the first released name in scan order, so input order
//! must be preserved by callers for reproducible output.
//!
//! Pure functions, no I/O.

use std::collections::BTreeSet;

use serde::Serialize;

/// Minimum similarity for a ranked game to count as released.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// A ranked game paired with its best-scoring released name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// The ranked-list game name.
    pub candidate: String,
    /// The released name it matched.
    pub matched: String,
    /// Similarity in `[0, 1]`.
    pub score: f64,
}

/// Case-insensitive similarity between two free-text names, in `[0, 1]`.
///
/// Identical strings (up to case) always score exactly 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Correlate ranked game names against released names.
///
/// Returns the set of matched candidates plus one [`MatchResult`] per match,
/// in candidate scan order. Empty `references` simply yields no matches.
pub fn correlate(
    candidates: &[String],
    references: &[String],
) -> (BTreeSet<String>, Vec<MatchResult>) {
    let mut matched = BTreeSet::new();
    let mut details = Vec::new();

    for candidate in candidates {
        let mut best_score = 0.0_f64;
        let mut best_match: Option<&str> = None;

        for reference in references {
            let score = similarity(candidate, reference);
            // Strict comparison keeps the first reference on ties.
            if score > best_score {
                best_score = score;
                best_match = Some(reference);
            }
        }

        match best_match {
            Some(reference) if best_score >= MATCH_THRESHOLD => {
                log::debug!(
                    "matched '{candidate}' with '{reference}' (similarity: {best_score:.2})"
                );
                matched.insert(candidate.clone());
                details.push(MatchResult {
                    candidate: candidate.clone(),
                    matched: reference.to_string(),
                    score: best_score,
                });
            }
            Some(reference) => {
                log::debug!(
                    "no good match for '{candidate}' (best: '{reference}' at {best_score:.2})"
                );
            }
            None => {
                log::debug!("no good match for '{candidate}' (no references)");
            }
        }
    }

    (matched, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("Hades", "Hades"), 1.0);
        assert_eq!(similarity("hades", "HADES"), 1.0);
    }

    #[test]
    fn similarity_is_bounded() {
        for (a, b) in [
            ("Noita", "Downwell"),
            ("", "Spelunky"),
            ("FTL", "FTL: Faster Than Light"),
        ] {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{score} out of bounds");
        }
    }

    #[test]
    fn exact_duplicate_is_always_matched() {
        let candidates = names(&["Dead Cells", "Noita"]);
        let references = names(&["dead cells"]);

        let (matched, details) = correlate(&candidates, &references);
        assert!(matched.contains("Dead Cells"));
        assert_eq!(details[0].score, 1.0);
        assert_eq!(details[0].matched, "dead cells");
    }

    #[test]
    fn matched_set_is_subset_of_candidates() {
        let candidates = names(&["Hades", "Celeste", "Gonner"]);
        let references = names(&["Hades", "Celeste 64", "Downwell"]);

        let (matched, _) = correlate(&candidates, &references);
        for name in &matched {
            assert!(candidates.contains(name));
        }
    }

    #[test]
    fn empty_references_yield_empty_matched_set() {
        let candidates = names(&["Hades"]);
        let (matched, details) = correlate(&candidates, &[]);
        assert!(matched.is_empty());
        assert!(details.is_empty());
    }

    #[test]
    fn below_threshold_candidates_are_dropped() {
        let candidates = names(&["Crypt of the NecroDancer"]);
        let references = names(&["Downwell"]);

        let (matched, _) = correlate(&candidates, &references);
        assert!(matched.is_empty());
    }

    #[test]
    fn one_reference_may_match_many_candidates() {
        // Name variants on the ranked side must not steal the reference from
        // each other.
        let candidates = names(&["Rogue Legacy", "Rogue Legacy "]);
        let references = names(&["Rogue Legacy"]);

        let (matched, details) = correlate(&candidates, &references);
        assert_eq!(matched.len(), 2);
        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|m| m.matched == "Rogue Legacy"));
    }

    #[test]
    fn ties_break_toward_first_reference_in_scan_order() {
        let candidates = names(&["Spelunky"]);
        // Both references are equidistant from the candidate.
        let references = names(&["Spelunky 2", "Spelunky 3"]);

        let (_, details) = correlate(&candidates, &references);
        assert_eq!(details[0].matched, "Spelunky 2");
    }

    #[test]
    fn spelunky_alias_scenario_scores_one() {
        // The alias table maps "Spelunky HD" -> "Spelunky" before
        // correlation, so the matcher sees an exact pair.
        let candidates = names(&["Spelunky"]);
        let references = names(&["Spelunky"]);

        let (matched, details) = correlate(&candidates, &references);
        assert!(matched.contains("Spelunky"));
        assert_eq!(details[0].score, 1.0);
    }
}
