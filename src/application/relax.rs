//! Threshold-relaxation driver.
//!
//! Evaluates a candidate pool against a descending list of minimum-profit
//! thresholds. Each round starts from scratch (prices are resolved again),
//! and the loop stops as soon as a round keeps enough deals. When even the
//! loosest threshold falls short, whatever that round kept is returned.

use std::ops::RangeInclusive;

use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::cascade::{Cascade, Resolution};
use crate::domain::{rank, Candidate, Deal, DealPolicy, Platform};

/// Caller-supplied bounds for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCriteria {
    pub platform: Platform,
    /// Maximum number of deals to return.
    pub size: usize,
    pub rating: RangeInclusive<u8>,
    pub price: RangeInclusive<u64>,
    pub discount: Decimal,
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// A round kept enough deals.
    Satisfied,
    /// Every threshold was tried; fewer deals than wanted.
    Partial,
    /// Nothing qualified at any threshold.
    Empty,
}

/// What one round did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub threshold: i64,
    /// Candidates whose price resolved.
    pub priced: usize,
    pub kept: usize,
}

/// Result of a full scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Ranked by descending profit.
    pub deals: Vec<Deal>,
    pub rounds: Vec<RoundSummary>,
    pub termination: Termination,
    /// Prices resolved in the final round.
    pub price_hits: usize,
}

/// Drives the cascade and the deal policy over a candidate pool.
#[derive(Debug, Clone)]
pub struct RelaxationDriver {
    policy: DealPolicy,
    thresholds: Vec<i64>,
    min_viable: usize,
    concurrency: usize,
    trust_inferred_rating: bool,
}

impl RelaxationDriver {
    /// `thresholds` are tried in the order given and should descend.
    #[must_use]
    pub fn new(policy: DealPolicy, thresholds: Vec<i64>, min_viable: usize) -> Self {
        Self {
            policy,
            thresholds,
            min_viable,
            concurrency: 1,
            trust_inferred_rating: true,
        }
    }

    /// Evaluate up to `concurrency` candidates at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Whether ratings guessed from names take part in rating filters.
    #[must_use]
    pub fn with_trust_inferred_rating(mut self, trust: bool) -> Self {
        self.trust_inferred_rating = trust;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &DealPolicy {
        &self.policy
    }

    #[must_use]
    pub fn thresholds(&self) -> &[i64] {
        &self.thresholds
    }

    fn rating_allows(&self, candidate: &Candidate, bounds: &RangeInclusive<u8>) -> bool {
        match candidate.effective_rating() {
            Some((_, true)) if !self.trust_inferred_rating => true,
            Some((rating, _)) => bounds.contains(&rating),
            None => true,
        }
    }

    pub async fn run(&self, cascade: &Cascade, pool: &[Candidate], criteria: &ScanCriteria) -> ScanOutcome {
        let eligible: Vec<&Candidate> = pool
            .iter()
            .filter(|c| self.rating_allows(c, &criteria.rating))
            .collect();
        let target = self.min_viable.min(criteria.size).max(1);

        let mut rounds = Vec::with_capacity(self.thresholds.len());
        let mut deals = Vec::new();
        let mut price_hits = 0;

        if eligible.is_empty() {
            debug!(pool = pool.len(), "No eligible candidates");
        } else {
            for &threshold in &self.thresholds {
                let (kept, priced) = self.round(cascade, &eligible, criteria, threshold).await;
                info!(threshold, priced, kept = kept.len(), "Relaxation round finished");
                rounds.push(RoundSummary {
                    threshold,
                    priced,
                    kept: kept.len(),
                });
                deals = kept;
                price_hits = priced;
                if deals.len() >= target {
                    break;
                }
            }
        }

        let termination = if deals.is_empty() {
            Termination::Empty
        } else if deals.len() >= target {
            Termination::Satisfied
        } else {
            Termination::Partial
        };
        rank(&mut deals);

        ScanOutcome {
            deals,
            rounds,
            termination,
            price_hits,
        }
    }

    /// One pass over the pool at a fixed threshold.
    ///
    /// Results arrive in pool order regardless of completion order, and the
    /// pass stops once `criteria.size` deals are kept.
    async fn round(
        &self,
        cascade: &Cascade,
        eligible: &[&Candidate],
        criteria: &ScanCriteria,
        threshold: i64,
    ) -> (Vec<Deal>, usize) {
        let mut evaluations = stream::iter(eligible.iter().copied())
            .map(|candidate| async move {
                let resolution = cascade.price(candidate, criteria.platform).await;
                (candidate, resolution)
            })
            .buffered(self.concurrency);

        let mut kept = Vec::new();
        let mut priced = 0;
        while let Some((candidate, resolution)) = evaluations.next().await {
            let Resolution::Resolved { value: quote, .. } = resolution else {
                continue;
            };
            priced += 1;
            if !criteria.price.contains(&quote.coins()) {
                continue;
            }
            let evaluation = self.policy.evaluate(quote.coins(), criteria.discount);
            if evaluation.profit < threshold {
                continue;
            }
            kept.push(Deal {
                candidate: candidate.clone(),
                quote,
                evaluation,
            });
            if kept.len() >= criteria.size {
                break;
            }
        }
        (kept, priced)
    }
}
