//! Source adapter port: one data source behind a uniform contract.

use async_trait::async_trait;

use crate::domain::{AttemptRecord, Candidate, Platform};

/// Parameters of a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Name to search for; `None` lists currently popular items.
    pub search: Option<String>,
    pub limit: usize,
    pub page: u32,
}

impl ListingQuery {
    #[must_use]
    pub fn popular(limit: usize) -> Self {
        Self {
            search: None,
            limit,
            page: 1,
        }
    }

    pub fn search(name: impl Into<String>, limit: usize) -> Self {
        Self {
            search: Some(name.into()),
            limit,
            page: 1,
        }
    }
}

/// A value together with the route that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed<T> {
    pub value: T,
    pub route: String,
}

/// Result of asking one source: an optional hit plus every attempt made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe<T> {
    pub hit: Option<Routed<T>>,
    pub attempts: Vec<AttemptRecord>,
}

impl<T> Probe<T> {
    #[must_use]
    pub fn miss(attempts: Vec<AttemptRecord>) -> Self {
        Self { hit: None, attempts }
    }

    pub fn hit(value: T, route: impl Into<String>, attempts: Vec<AttemptRecord>) -> Self {
        Self {
            hit: Some(Routed {
                value,
                route: route.into(),
            }),
            attempts,
        }
    }
}

/// A data source that can list candidates and/or resolve prices.
///
/// Implementations are stateless request pipelines: they never fail outright,
/// reporting misses through [`Probe::hit`] being `None` and the reasons in
/// [`Probe::attempts`].
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable identifier used for provenance.
    fn id(&self) -> &str;

    fn supports_listing(&self) -> bool;

    fn supports_pricing(&self) -> bool;

    /// Whether ids supplied by a caller are in this source's namespace.
    fn accepts_caller_ids(&self) -> bool {
        false
    }

    /// List candidates. A hit is always non-empty.
    async fn list_candidates(&self, query: &ListingQuery) -> Probe<Vec<Candidate>>;

    /// Resolve the lowest buy-now price. A hit is always greater than zero.
    async fn resolve_price(&self, candidate: &Candidate, platform: Platform) -> Probe<u64>;
}
