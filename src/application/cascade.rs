//! Resolution cascade.
//!
//! Asks sources one at a time in priority order and stops at the first
//! answer. "Nobody knew" is a normal outcome ([`Resolution::Unresolved`]),
//! not an error; per-source failures only show up in the attempt trail.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{dedupe, AttemptRecord, Candidate, Platform, PriceQuote};
use crate::port::outbound::source::{ListingQuery, SourceAdapter};

/// How listing results from several sources are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingStrategy {
    /// Stop at the first source with a non-empty list.
    #[default]
    FirstHit,
    /// Ask every listing source and concatenate the deduplicated results.
    Merge,
}

/// Outcome of one logical lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved {
        value: T,
        source: String,
        route: String,
        attempts: Vec<AttemptRecord>,
    },
    Unresolved {
        attempts: Vec<AttemptRecord>,
    },
}

impl<T> Resolution<T> {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved { value, .. } => Some(value),
            Self::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            Self::Resolved { attempts, .. } | Self::Unresolved { attempts } => attempts,
        }
    }
}

/// Ordered fallback over a set of sources.
#[derive(Clone)]
pub struct Cascade {
    sources: Vec<Arc<dyn SourceAdapter>>,
    strategy: ListingStrategy,
    prefer_origin: bool,
}

impl Cascade {
    /// Sources are consulted in the order given.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            sources,
            strategy: ListingStrategy::default(),
            prefer_origin: true,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: ListingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Try a candidate's origin source first when pricing it.
    #[must_use]
    pub fn with_prefer_origin(mut self, prefer_origin: bool) -> Self {
        self.prefer_origin = prefer_origin;
        self
    }

    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.sources
    }

    /// Source whose namespace a caller-supplied id belongs to.
    ///
    /// The first pricing source that declares it accepts caller ids, else
    /// the first pricing source.
    #[must_use]
    pub fn caller_id_owner(&self) -> Option<&str> {
        let mut pricing = self.sources.iter().filter(|s| s.supports_pricing());
        let first = pricing.clone().next();
        pricing
            .find(|s| s.accepts_caller_ids())
            .or(first)
            .map(|s| s.id())
    }

    /// A cascade over the single source with this id.
    #[must_use]
    pub fn restricted_to(&self, source: &str) -> Option<Self> {
        let found = self.sources.iter().find(|s| s.id() == source)?;
        Some(Self {
            sources: vec![Arc::clone(found)],
            ..self.clone()
        })
    }

    /// List candidates from the first source that has any.
    pub async fn list(&self, query: &ListingQuery) -> Resolution<Vec<Candidate>> {
        let mut attempts = Vec::new();
        let mut merged: Vec<(String, String, Vec<Candidate>)> = Vec::new();

        for source in self.sources.iter().filter(|s| s.supports_listing()) {
            let probe = source.list_candidates(query).await;
            attempts.extend(probe.attempts);
            let Some(hit) = probe.hit.filter(|h| !h.value.is_empty()) else {
                debug!(source = source.id(), "Listing miss");
                continue;
            };
            debug!(source = source.id(), route = %hit.route, count = hit.value.len(), "Listing hit");
            match self.strategy {
                ListingStrategy::FirstHit => {
                    return Resolution::Resolved {
                        value: hit.value,
                        source: source.id().to_string(),
                        route: hit.route,
                        attempts,
                    };
                }
                ListingStrategy::Merge => {
                    merged.push((source.id().to_string(), hit.route, hit.value));
                }
            }
        }

        if merged.is_empty() {
            return Resolution::Unresolved { attempts };
        }
        let source = merged.iter().map(|(s, _, _)| s.as_str()).collect::<Vec<_>>().join("+");
        let route = merged.iter().map(|(_, r, _)| r.as_str()).collect::<Vec<_>>().join(" | ");
        let value = dedupe(merged.into_iter().flat_map(|(_, _, v)| v).collect());
        Resolution::Resolved {
            value,
            source,
            route,
            attempts,
        }
    }

    /// Resolve the lowest buy-now price of one candidate.
    pub async fn price(&self, candidate: &Candidate, platform: Platform) -> Resolution<PriceQuote> {
        let mut attempts = Vec::new();
        for source in self.pricing_order(candidate) {
            let probe = source.resolve_price(candidate, platform).await;
            attempts.extend(probe.attempts);
            let quote = probe.hit.and_then(|hit| {
                PriceQuote::new(hit.value, source.id(), hit.route, platform)
            });
            if let Some(quote) = quote {
                debug!(
                    candidate = candidate.name(),
                    source = source.id(),
                    coins = quote.coins(),
                    "Price resolved"
                );
                return Resolution::Resolved {
                    source: quote.source.clone(),
                    route: quote.route.clone(),
                    value: quote,
                    attempts,
                };
            }
        }
        debug!(candidate = candidate.name(), attempts = attempts.len(), "Price unresolved");
        Resolution::Unresolved { attempts }
    }

    fn pricing_order(&self, candidate: &Candidate) -> Vec<&Arc<dyn SourceAdapter>> {
        let mut order: Vec<_> = self.sources.iter().filter(|s| s.supports_pricing()).collect();
        if self.prefer_origin {
            if let Some(origin) = candidate.origin() {
                // Stable: only the origin source moves.
                order.sort_by_key(|s| s.id() != origin);
            }
        }
        order
    }
}
