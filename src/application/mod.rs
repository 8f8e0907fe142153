//! Application services (use cases).
//!
//! The cascade and relaxation driver implement the resolution engine;
//! [`service::ScoutService`] maps inbound requests onto them.

pub mod cascade;
pub mod query;
pub mod relax;
pub mod response;
pub mod service;
