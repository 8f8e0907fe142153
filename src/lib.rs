//! Binscout - lowest buy-now prices and resale deals across unreliable sources.
//!
//! Player cards are listed and priced by several third-party sources, none of
//! which can be trusted to answer. Every lookup walks an ordered cascade of
//! sources and routes, records what each attempt did, and degrades to an
//! empty or partial answer instead of failing.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types: candidates, quotes, attempts, the deal policy
//! - [`port`] - Traits at the seams: [`port::outbound::fetch::Fetcher`] and
//!   [`port::outbound::source::SourceAdapter`]
//! - [`adapter`] - HTTP fetcher, payload normalizers, route-table sources, CLI
//! - [`application`] - Resolution cascade, threshold relaxation, request handling
//! - [`infrastructure`] - Configuration and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use binscout::application::query::Params;
//! use binscout::infrastructure::bootstrap::build_service;
//! use binscout::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_default(None)?;
//! let service = build_service(&config)?;
//! let params: Params = [("mode", "scan"), ("size", "10")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! let reply = service.handle(&params).await;
//! println!("{}", serde_json::to_string(&reply.body)?);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
