//! Outbound adapters (driven side).

pub mod http;
pub mod normalize;
pub mod source;
