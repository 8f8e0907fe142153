//! Response bodies.
//!
//! Every body carries `ok`. Failures are `{ ok: false, error, items: [] }`
//! with the error text bounded in length.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::query::Query;
use super::relax::{RoundSummary, ScanOutcome, Termination};
use crate::domain::{chemistry_hint, AttemptRecord, Candidate, Deal, Platform};

/// Truncate to at most `max` characters.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Query parameters echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEcho {
    pub mode: &'static str,
    pub platform: Platform,
    pub size: usize,
    pub ovr_min: u8,
    pub ovr_max: u8,
    pub bin_min: u64,
    pub bin_max: u64,
    pub discount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl From<&Query> for QueryEcho {
    fn from(query: &Query) -> Self {
        Self {
            mode: query.mode.as_str(),
            platform: query.platform,
            size: query.size,
            ovr_min: *query.rating.start(),
            ovr_max: *query.rating.end(),
            bin_min: *query.price.start(),
            bin_max: *query.price.end(),
            discount: query.discount,
            name: query.name.clone(),
            player_id: query.player_id.as_ref().map(ToString::to_string),
            source: query.source.clone(),
        }
    }
}

/// A listed candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub rating_inferred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub chem: &'static str,
}

impl From<&Candidate> for CandidateItem {
    fn from(candidate: &Candidate) -> Self {
        let rating = candidate.effective_rating();
        Self {
            name: candidate.name().to_string(),
            id: candidate.id().map(ToString::to_string),
            rating: rating.map(|(r, _)| r),
            rating_inferred: rating.is_some_and(|(_, inferred)| inferred),
            position: candidate.position().map(str::to_string),
            source: candidate.origin().map(str::to_string),
            chem: chemistry_hint(candidate.position()),
        }
    }
}

/// A priced candidate with its buy/sell/profit recommendation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealItem {
    #[serde(flatten)]
    pub candidate: CandidateItem,
    /// Lowest buy-now price.
    pub bin: u64,
    pub platform: Platform,
    pub price_source: String,
    pub price_route: String,
    pub buy: u64,
    pub sell: u64,
    pub profit: i64,
}

impl From<&Deal> for DealItem {
    fn from(deal: &Deal) -> Self {
        Self {
            candidate: CandidateItem::from(&deal.candidate),
            bin: deal.quote.coins(),
            platform: deal.quote.platform,
            price_source: deal.quote.source.clone(),
            price_route: deal.quote.route.clone(),
            buy: deal.evaluation.buy_threshold,
            sell: deal.evaluation.sale_proceeds,
            profit: deal.evaluation.profit,
        }
    }
}

/// Health of one listing source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    pub source: String,
    pub ok: bool,
    pub items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Item {
    Deal(DealItem),
    Candidate(CandidateItem),
    Source(SourceStatus),
}

/// Which source and route answered.
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub source: String,
    pub route: String,
}

/// Scan statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub price_hits: usize,
    pub termination: Termination,
    pub rounds: Vec<RoundSummary>,
}

impl From<&ScanOutcome> for ScanSummary {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            price_hits: outcome.price_hits,
            termination: outcome.termination,
            rounds: outcome.rounds.clone(),
        }
    }
}

/// JSON body returned for every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub query: Option<QueryEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(flatten)]
    pub scan: Option<ScanSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptRecord>,
    pub items: Vec<Item>,
}

impl ResponseBody {
    #[must_use]
    pub fn success(items: Vec<Item>) -> Self {
        Self {
            ok: true,
            error: None,
            generated_at: Utc::now(),
            query: None,
            provenance: None,
            scan: None,
            attempts: Vec::new(),
            items,
        }
    }

    /// A failed body with the error truncated to `max_error_len` characters.
    #[must_use]
    pub fn failure(error: &str, max_error_len: usize) -> Self {
        Self {
            ok: false,
            error: Some(truncate(error, max_error_len)),
            ..Self::success(Vec::new())
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &Query) -> Self {
        self.query = Some(QueryEcho::from(query));
        self
    }

    #[must_use]
    pub fn with_provenance(mut self, source: &str, route: &str) -> Self {
        self.provenance = Some(Provenance {
            source: source.to_string(),
            route: route.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_scan(mut self, outcome: &ScanOutcome) -> Self {
        self.scan = Some(ScanSummary::from(outcome));
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: &[AttemptRecord]) -> Self {
        self.attempts = attempts.to_vec();
        self
    }
}
