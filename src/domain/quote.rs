//! Resolved prices and their provenance.

use std::num::NonZeroU64;

use serde::Serialize;

use super::platform::Platform;

/// Cheapest observed buy-now price for an item on one platform.
///
/// The amount is non-zero by construction; an unresolved price is modelled
/// as the absence of a quote, never as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub amount: NonZeroU64,
    pub source: String,
    pub route: String,
    pub platform: Platform,
}

impl PriceQuote {
    /// Build a quote, returning `None` for a zero amount.
    pub fn new(
        amount: u64,
        source: impl Into<String>,
        route: impl Into<String>,
        platform: Platform,
    ) -> Option<Self> {
        Some(Self {
            amount: NonZeroU64::new(amount)?,
            source: source.into(),
            route: route.into(),
            platform,
        })
    }

    #[must_use]
    pub fn coins(&self) -> u64 {
        self.amount.get()
    }
}
