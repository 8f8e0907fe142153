//! In-memory [`SourceAdapter`] with call counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{normalize_name, AttemptOutcome, AttemptRecord, Candidate, Platform};
use crate::port::outbound::source::{ListingQuery, Probe, SourceAdapter};

/// A source answering from fixed data.
///
/// Listings return the configured candidates (tagged with this source as
/// origin); prices are looked up by normalized name, then fall back to the
/// default price if one is set. Anything else is a miss.
pub struct StubSource {
    id: String,
    listing: Vec<Candidate>,
    prices: HashMap<String, u64>,
    default_price: Option<u64>,
    caller_ids: bool,
    listing_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl StubSource {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            listing: Vec::new(),
            prices: HashMap::new(),
            default_price: None,
            caller_ids: false,
            listing_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_listing(mut self, candidates: Vec<Candidate>) -> Self {
        self.listing = candidates;
        self
    }

    pub fn with_price(mut self, name: &str, coins: u64) -> Self {
        self.prices.insert(normalize_name(name), coins);
        self
    }

    pub fn with_default_price(mut self, coins: u64) -> Self {
        self.default_price = Some(coins);
        self
    }

    /// Claim caller-supplied ids for this source.
    pub fn with_caller_ids(mut self) -> Self {
        self.caller_ids = true;
        self
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    fn record(&self, outcome: AttemptOutcome) -> Vec<AttemptRecord> {
        vec![AttemptRecord::new(self.id.as_str(), "stub", outcome)]
    }
}

#[async_trait]
impl SourceAdapter for StubSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn supports_listing(&self) -> bool {
        true
    }

    fn supports_pricing(&self) -> bool {
        true
    }

    fn accepts_caller_ids(&self) -> bool {
        self.caller_ids
    }

    async fn list_candidates(&self, query: &ListingQuery) -> Probe<Vec<Candidate>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let found: Vec<Candidate> = self
            .listing
            .iter()
            .take(query.limit)
            .map(|c| c.clone().with_origin(self.id.as_str()))
            .collect();
        if found.is_empty() {
            Probe::miss(self.record(AttemptOutcome::Empty))
        } else {
            Probe::hit(found, "stub", self.record(AttemptOutcome::Resolved))
        }
    }

    async fn resolve_price(&self, candidate: &Candidate, _platform: Platform) -> Probe<u64> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        let price = self
            .prices
            .get(&normalize_name(candidate.name()))
            .copied()
            .or(self.default_price);
        match price {
            Some(coins) => Probe::hit(coins, "stub", self.record(AttemptOutcome::Resolved)),
            None => Probe::miss(self.record(AttemptOutcome::Http(403))),
        }
    }
}

/// Upcast stubs for a [`Cascade`](crate::application::cascade::Cascade).
pub fn adapters(stubs: &[&Arc<StubSource>]) -> Vec<Arc<dyn SourceAdapter>> {
    stubs
        .iter()
        .map(|stub| Arc::clone(stub) as Arc<dyn SourceAdapter>)
        .collect()
}
