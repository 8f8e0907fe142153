//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fetcher`]: `ScriptedFetcher`, a [`Fetcher`](crate::port::outbound::fetch::Fetcher)
//!   answering from scripted responses.
//! - [`source`]: `StubSource`, an in-memory source with call counters.
//! - [`domain`]: Builders for candidates and policies.
//! - [`config`]: Canonical test configurations.

pub mod config;
pub mod domain;
pub mod fetcher;
pub mod source;
