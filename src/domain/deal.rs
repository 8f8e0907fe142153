//! Deal evaluation: buy threshold, resale proceeds and profit for a price.
//!
//! All arithmetic runs on [`Decimal`] so that rounding to the market's price
//! step is exact. The policy constants are configuration; the algorithm is
//! fixed:
//!
//! - `buy = round_step(price * (1 - discount / 100))`, never above `price`
//! - `sell = round_step((buy + relist_fee) / (1 - tax_rate))`
//! - `profit = floor(sell * (1 - tax_rate) - buy)`

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use super::candidate::Candidate;
use super::quote::PriceQuote;

/// Rejected deal policy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("rounding step must be greater than 0")]
    ZeroStep,
    #[error("tax rate must be in [0, 0.99), got {0}")]
    TaxRate(Decimal),
}

/// Exclusive upper bound on the tax rate. Resale proceeds divide by
/// `1 - tax_rate`, which must stay far enough from zero.
#[must_use]
pub fn max_tax_rate() -> Decimal {
    Decimal::new(99, 2)
}

/// Market constants used to evaluate a deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealPolicy {
    rounding_step: u64,
    relist_fee: u64,
    tax_rate: Decimal,
}

impl DealPolicy {
    /// Create a policy.
    ///
    /// # Errors
    ///
    /// Fails when the step is zero or the tax rate is outside `[0, 0.99)`.
    pub fn new(rounding_step: u64, relist_fee: u64, tax_rate: Decimal) -> Result<Self, PolicyError> {
        if rounding_step == 0 {
            return Err(PolicyError::ZeroStep);
        }
        if tax_rate < Decimal::ZERO || tax_rate >= max_tax_rate() {
            return Err(PolicyError::TaxRate(tax_rate));
        }
        Ok(Self {
            rounding_step,
            relist_fee,
            tax_rate,
        })
    }

    #[must_use]
    pub const fn rounding_step(&self) -> u64 {
        self.rounding_step
    }

    #[must_use]
    pub const fn relist_fee(&self) -> u64 {
        self.relist_fee
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Evaluate buying at a discount below `price` and relisting.
    ///
    /// `discount_percent` is clamped to `[0, 100)`.
    #[must_use]
    pub fn evaluate(&self, price: u64, discount_percent: Decimal) -> DealEvaluation {
        let step = Decimal::from(self.rounding_step);
        let price_dec = Decimal::from(price);
        let discount = discount_percent
            .max(Decimal::ZERO)
            .min(Decimal::ONE_HUNDRED - Decimal::new(1, 6));
        let keep = Decimal::ONE - self.tax_rate;

        let mut buy = round_to_step(price_dec * (Decimal::ONE - discount / Decimal::ONE_HUNDRED), step);
        if buy > price_dec {
            buy = (price_dec / step).floor() * step;
        }

        let sale = round_to_step((buy + Decimal::from(self.relist_fee)) / keep, step);
        let profit = (sale * keep - buy).floor();

        DealEvaluation {
            buy_threshold: buy.to_u64().unwrap_or_default(),
            sale_proceeds: sale.to_u64().unwrap_or(u64::MAX),
            profit: profit.to_i64().unwrap_or(if profit.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            }),
        }
    }
}

impl Default for DealPolicy {
    fn default() -> Self {
        Self {
            rounding_step: 100,
            relist_fee: 1000,
            tax_rate: Decimal::new(5, 2),
        }
    }
}

fn round_to_step(value: Decimal, step: Decimal) -> Decimal {
    (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}

/// Buy/sell recommendation derived from a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealEvaluation {
    pub buy_threshold: u64,
    pub sale_proceeds: u64,
    pub profit: i64,
}

/// A priced candidate with its evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub candidate: Candidate,
    pub quote: PriceQuote,
    pub evaluation: DealEvaluation,
}

impl Deal {
    #[must_use]
    pub fn profit(&self) -> i64 {
        self.evaluation.profit
    }
}
