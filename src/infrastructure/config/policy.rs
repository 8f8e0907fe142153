//! Deal policy configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{DealPolicy, PolicyError};

/// Market constants, `[policy]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Prices are quoted in multiples of this step.
    #[serde(default = "default_rounding_step")]
    pub rounding_step: u64,
    /// Flat fee added to the buy threshold when relisting.
    #[serde(default = "default_relist_fee")]
    pub relist_fee: u64,
    /// Share of the sale price kept by the market, in `[0, 0.99)`.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

const fn default_rounding_step() -> u64 {
    100
}

const fn default_relist_fee() -> u64 {
    1000
}

fn default_tax_rate() -> Decimal {
    Decimal::new(5, 2)
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rounding_step: default_rounding_step(),
            relist_fee: default_relist_fee(),
            tax_rate: default_tax_rate(),
        }
    }
}

impl PolicyConfig {
    /// # Errors
    ///
    /// Fails on a zero step or a tax rate outside `[0, 0.99)`.
    pub fn to_policy(&self) -> Result<DealPolicy, PolicyError> {
        DealPolicy::new(self.rounding_step, self.relist_fee, self.tax_rate)
    }
}
