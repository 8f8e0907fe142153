//! Scan and diagnostics configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::cascade::ListingStrategy;
use crate::application::service::ServiceSettings;

/// Relaxation and cascade settings, `[scan]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Minimum-profit thresholds, tried in order. Must strictly descend.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<i64>,
    /// Deals needed before a round counts as good enough.
    #[serde(default = "default_min_viable")]
    pub min_viable: usize,
    /// Candidates priced at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Minimum candidate pool listed for a scan.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default)]
    pub listing_strategy: ListingStrategy,
    /// Price a candidate at the source it was listed by first.
    #[serde(default = "default_true")]
    pub prefer_origin: bool,
    /// Apply rating filters to ratings guessed from names.
    #[serde(default = "default_true")]
    pub trust_inferred_rating: bool,
    /// Discount percent used when a request has none.
    #[serde(default = "default_discount")]
    pub default_discount: Decimal,
}

fn default_thresholds() -> Vec<i64> {
    vec![800, 700, 600, 500]
}

const fn default_min_viable() -> usize {
    5
}

const fn default_concurrency() -> usize {
    4
}

const fn default_pool_size() -> usize {
    80
}

const fn default_true() -> bool {
    true
}

fn default_discount() -> Decimal {
    Decimal::new(3, 0)
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            min_viable: default_min_viable(),
            concurrency: default_concurrency(),
            pool_size: default_pool_size(),
            listing_strategy: ListingStrategy::default(),
            prefer_origin: true,
            trust_inferred_rating: true,
            default_discount: default_discount(),
        }
    }
}

/// Response diagnostics, `[diagnostics]`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    /// Error text is cut to this many characters.
    #[serde(default = "default_max_error_len")]
    pub max_error_len: usize,
    /// Attach the attempt trail to list, find and price responses.
    #[serde(default = "default_true")]
    pub include_attempts: bool,
}

const fn default_max_error_len() -> usize {
    200
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_error_len: default_max_error_len(),
            include_attempts: true,
        }
    }
}

/// Service knobs drawn from both sections.
#[must_use]
pub fn service_settings(scan: &ScanConfig, diagnostics: &DiagnosticsConfig) -> ServiceSettings {
    ServiceSettings {
        max_error_len: diagnostics.max_error_len,
        include_attempts: diagnostics.include_attempts,
        scan_pool_size: scan.pool_size,
        default_discount: scan.default_discount,
    }
}
