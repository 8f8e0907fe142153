//! Source-agnostic domain types and pure deal logic.

mod attempt;
mod candidate;
mod chemistry;
mod deal;
mod dedup;
mod id;
mod platform;
mod quote;

pub use attempt::{AttemptOutcome, AttemptRecord};
pub use candidate::{Candidate, MAX_RATING};
pub use chemistry::chemistry_hint;
pub use deal::{max_tax_rate, Deal, DealEvaluation, DealPolicy, PolicyError};
pub use dedup::{dedupe, normalize_name, rank};
pub use id::CandidateId;
pub use platform::{Platform, UnknownPlatform};
pub use quote::PriceQuote;
