//! Candidate deduplication and deal ranking.

use std::collections::HashSet;

use super::candidate::Candidate;
use super::deal::Deal;

/// Lowercase a name and drop everything that is not alphanumeric.
///
/// `"Vinícius Jr."` and `"vinícius jr"` normalise to the same key.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drop duplicate candidates, keeping the first occurrence.
///
/// Candidates are keyed by id when one is present, by normalised name
/// otherwise; a candidate whose normalised name was already seen is dropped
/// as well, so the output never holds two equal names.
#[must_use]
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    candidates
        .into_iter()
        .filter(|candidate| {
            let name = normalize_name(candidate.name());
            if seen_names.contains(&name) {
                return false;
            }
            if let Some(id) = candidate.id() {
                let key = (candidate.origin().map(str::to_owned), id.as_str().to_owned());
                if !seen_ids.insert(key) {
                    return false;
                }
            }
            seen_names.insert(name);
            true
        })
        .collect()
}

/// Order deals by descending profit; equal profits keep discovery order.
pub fn rank(deals: &mut [Deal]) {
    deals.sort_by(|a, b| b.profit().cmp(&a.profit()));
}
