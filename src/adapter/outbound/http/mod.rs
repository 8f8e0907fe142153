//! HTTP transport for catalog APIs and scrape targets.

pub mod polite;
pub mod settings;

pub use polite::PoliteFetcher;
pub use settings::FetchConfig;
