//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the resolution engine and the outside
//! world. Outbound adapters implement them for real HTTP transports;
//! the `testkit` module implements them with scripted responses.
//!
//! ```text
//!        ┌──────────────────────────────┐
//!        │         Application          │
//!        │  cascade · relaxation · svc  │
//!        └──────────────┬───────────────┘
//!                       │ SourceAdapter
//!              ┌────────▼────────┐
//!              │  Source Adapter │  (route table + normalizer)
//!              └────────┬────────┘
//!                       │ Fetcher
//!              ┌────────▼────────┐
//!              │  Polite Fetcher │
//!              └─────────────────┘
//! ```

pub mod outbound;

pub use outbound::fetch::{FetchError, FetchRequest, Fetcher, RawResponse};
pub use outbound::source::{ListingQuery, Probe, Routed, SourceAdapter};
