//! Builders for domain primitives used across tests.

use rust_decimal::Decimal;

use crate::domain::{Candidate, CandidateId, DealPolicy};

/// A candidate with only a name.
///
/// # Panics
///
/// Panics on a blank name.
pub fn candidate(name: &str) -> Candidate {
    Candidate::new(name).unwrap_or_else(|| panic!("blank candidate name {name:?}"))
}

/// A candidate carrying `id` from the `origin` source's namespace.
pub fn sourced(name: &str, id: &str, origin: &str) -> Candidate {
    candidate(name).with_id(CandidateId::new(id)).with_origin(origin)
}

/// One candidate per name, in order.
pub fn candidates(names: &[&str]) -> Vec<Candidate> {
    names.iter().map(|name| candidate(name)).collect()
}

/// Policy with coarse steps so profits are easy to compute by hand:
/// step 1000, relist fee 500, tax 5%.
///
/// # Panics
///
/// Never; the constants are valid.
pub fn coarse_policy() -> DealPolicy {
    DealPolicy::new(1000, 500, Decimal::new(5, 2)).unwrap_or_else(|e| panic!("{e}"))
}
