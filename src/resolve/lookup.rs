//! Remote identifier lookup and best-candidate selection.
//!
//! The lookup collaborator returns zero or more `{id, name}` candidates for
//! a free-text query. Selection is a weighted score with independently
//! testable terms: the base similarity ratio, a bonus for exact or
//! substring equality, and a penalty for sequel-looking candidates when the
//! query itself has no sequel marker.

use std::time::Duration;

use serde::Deserialize;

use crate::matcher::similarity;

/// One candidate returned by the lookup service.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LookupHit {
    pub id: u64,
    pub name: String,
}

/// Remote search collaborator yielding identifier candidates for a name.
pub trait GameLookup {
    fn search(&self, name: &str) -> Result<Vec<LookupHit>, String>;
}

/// Names the search service reliably gets wrong, pinned to known ids.
/// Keys are exact lowercase-trimmed matches.
const ID_OVERRIDES: &[(&str, u64)] = &[
    ("ftl", 212680),
    ("binding of isaac", 113200),
];

/// Identifier for a known problematic name, bypassing the search service.
pub fn override_id(name: &str) -> Option<u64> {
    let key = name.trim().to_lowercase();
    ID_OVERRIDES
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, id)| *id)
}

/// Markers that make a name look like a sequel. Substring containment,
/// matching the scoring the cached identifiers were produced with.
const SEQUEL_MARKERS: &[&str] = &["2", "3", "4", "5", "ii", "iii", "iv", "v"];

fn has_sequel_marker(name: &str) -> bool {
    SEQUEL_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Bonus for exact or substring equality between query and candidate.
pub fn equality_bonus(query: &str, candidate: &str) -> f64 {
    if query == candidate {
        1.0
    } else if query.contains(candidate) || candidate.contains(query) {
        0.5
    } else {
        0.0
    }
}

/// Penalty when the query has no sequel marker but the candidate does.
pub fn sequel_penalty(query: &str, candidate: &str) -> f64 {
    if !has_sequel_marker(query) && has_sequel_marker(candidate) {
        -0.3
    } else {
        0.0
    }
}

/// Weighted score of one candidate against the query. Both sides are
/// lowercased before every term.
pub fn candidate_score(query: &str, candidate: &str) -> f64 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();
    similarity(&query, &candidate)
        + equality_bonus(&query, &candidate)
        + sequel_penalty(&query, &candidate)
}

/// Select the best-scoring candidate for a query.
///
/// Ties break toward the earlier candidate; a winner must score strictly
/// above zero, otherwise there is no acceptable match.
pub fn pick_best<'a>(query: &str, candidates: &'a [LookupHit]) -> Option<&'a LookupHit> {
    let mut best: Option<&LookupHit> = None;
    let mut best_score = 0.0_f64;

    for candidate in candidates {
        let score = candidate_score(query, &candidate.name);
        log::debug!("  {}: score {score:.2}", candidate.name);
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }

    if let Some(hit) = best {
        log::debug!(
            "best match: '{}' (id: {}, score: {best_score:.2})",
            hit.name,
            hit.id
        );
    }
    best
}

#[derive(Debug, Default, Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<LookupHit>,
}

/// Steam storefront search client.
pub struct SteamStoreSearch {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for SteamStoreSearch {
    fn default() -> Self {
        Self::new("https://store.steampowered.com/api/storesearch/")
    }
}

impl SteamStoreSearch {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(10))
            .build();
        SteamStoreSearch {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl GameLookup for SteamStoreSearch {
    fn search(&self, name: &str) -> Result<Vec<LookupHit>, String> {
        let url = format!(
            "{}?term={}&l=english&cc=US",
            self.base_url,
            urlencoding::encode(name)
        );
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|error| format!("search request failed: {error}"))?;
        let parsed: StoreSearchResponse = response
            .into_json()
            .map_err(|error| format!("invalid search response: {error}"))?;
        Ok(parsed.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(values: &[(u64, &str)]) -> Vec<LookupHit> {
        values
            .iter()
            .map(|(id, name)| LookupHit {
                id: *id,
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn equality_bonus_terms() {
        assert_eq!(equality_bonus("hades", "hades"), 1.0);
        assert_eq!(equality_bonus("hades", "hades ii"), 0.5);
        assert_eq!(equality_bonus("hades ii", "hades"), 0.5);
        assert_eq!(equality_bonus("hades", "celeste"), 0.0);
    }

    #[test]
    fn sequel_penalty_only_hits_unprompted_sequels() {
        assert_eq!(sequel_penalty("spelunky", "spelunky 2"), -0.3);
        assert_eq!(sequel_penalty("spelunky 2", "spelunky 2"), 0.0);
        assert_eq!(sequel_penalty("risk of rain 2", "risk of rain"), 0.0);
    }

    #[test]
    fn exact_match_bonus_dominates_partial_substring() {
        let candidates = hits(&[(1242220, "Rogue Legacy"), (1253920, "Rogue Legacy 2")]);
        let best = pick_best("Rogue Legacy 2", &candidates).expect("a winner");
        assert_eq!(best.name, "Rogue Legacy 2");
    }

    #[test]
    fn sequel_is_penalized_when_query_is_the_original() {
        let candidates = hits(&[(239350, "Spelunky 2"), (239340, "Spelunky")]);
        let best = pick_best("Spelunky", &candidates).expect("a winner");
        assert_eq!(best.name, "Spelunky");
    }

    #[test]
    fn scoring_is_case_insensitive() {
        assert_eq!(
            candidate_score("HADES", "hades"),
            candidate_score("hades", "hades")
        );
    }

    #[test]
    fn ties_break_toward_earlier_candidate() {
        let candidates = hits(&[(1, "Monster Train"), (2, "Monster Train")]);
        let best = pick_best("Monster Train", &candidates).expect("a winner");
        assert_eq!(best.id, 1);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(pick_best("Hades", &[]).is_none());
    }

    #[test]
    fn override_table_matches_exact_lowercase_keys() {
        assert_eq!(override_id("FTL"), Some(212680));
        assert_eq!(override_id(" ftl "), Some(212680));
        assert_eq!(override_id("FTL: Faster Than Light"), None);
    }
}
