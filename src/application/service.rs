//! Request handling.
//!
//! [`ScoutService::handle`] is the single entry point for every inbound
//! shell. Only a malformed request is rejected; every downstream failure
//! degrades to an `ok: false` or partial body.

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::cascade::{Cascade, Resolution};
use super::query::{Mode, Params, Query};
use super::relax::{RelaxationDriver, ScanCriteria};
use super::response::{truncate, CandidateItem, DealItem, Item, ResponseBody, SourceStatus};
use crate::domain::{dedupe, AttemptRecord, Candidate, Deal};
use crate::error::RequestError;
use crate::port::outbound::source::ListingQuery;

/// Listing size used by the status probe.
const STATUS_PROBE_LIMIT: usize = 10;

/// Knobs that shape responses and scans.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub max_error_len: usize,
    pub include_attempts: bool,
    /// Minimum number of candidates listed for a scan.
    pub scan_pool_size: usize,
    pub default_discount: Decimal,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            max_error_len: 200,
            include_attempts: true,
            scan_pool_size: 80,
            default_discount: Decimal::new(3, 0),
        }
    }
}

/// Whether a request was served or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Ok,
    BadRequest,
}

impl ReplyStatus {
    /// HTTP status an outer shell should use.
    #[must_use]
    pub const fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: ReplyStatus,
    pub body: ResponseBody,
}

impl Reply {
    fn ok(body: ResponseBody) -> Self {
        Self {
            status: ReplyStatus::Ok,
            body,
        }
    }
}

/// Listing, pricing and deal scanning over a cascade of sources.
pub struct ScoutService {
    cascade: Cascade,
    driver: RelaxationDriver,
    settings: ServiceSettings,
}

impl ScoutService {
    #[must_use]
    pub fn new(cascade: Cascade, driver: RelaxationDriver, settings: ServiceSettings) -> Self {
        Self {
            cascade,
            driver,
            settings,
        }
    }

    #[must_use]
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Serve one request.
    pub async fn handle(&self, params: &Params) -> Reply {
        match self.try_handle(params).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "Rejected request");
                Reply {
                    status: ReplyStatus::BadRequest,
                    body: self.failure(&err.to_string()),
                }
            }
        }
    }

    async fn try_handle(&self, params: &Params) -> Result<Reply, RequestError> {
        let query = Query::parse(params, self.settings.default_discount)?;
        let cascade = match query.source.as_deref() {
            Some(id) => self
                .cascade
                .restricted_to(id)
                .ok_or_else(|| RequestError::InvalidParameter {
                    name: "source",
                    reason: format!("unknown source '{id}'"),
                })?,
            None => self.cascade.clone(),
        };
        info!(mode = %query.mode, platform = %query.platform, size = query.size, "Handling request");

        let body = match query.mode {
            Mode::Status => self.status(&cascade).await,
            Mode::List => {
                let listing = ListingQuery {
                    search: None,
                    limit: query.listing_limit(),
                    page: query.page,
                };
                self.listing(&cascade, &listing).await
            }
            Mode::Find => {
                let listing = ListingQuery {
                    search: query.name.clone(),
                    limit: query.listing_limit(),
                    page: query.page,
                };
                self.listing(&cascade, &listing).await
            }
            Mode::Price => self.price(&cascade, &query).await,
            Mode::Scan => self.scan(&cascade, &query).await,
        };
        Ok(Reply::ok(body.with_query(&query)))
    }

    fn failure(&self, error: &str) -> ResponseBody {
        ResponseBody::failure(error, self.settings.max_error_len)
    }

    fn attempts_for<T>(&self, body: ResponseBody, resolution: &Resolution<T>) -> ResponseBody {
        if self.settings.include_attempts {
            body.with_attempts(resolution.attempts())
        } else {
            body
        }
    }

    async fn status(&self, cascade: &Cascade) -> ResponseBody {
        let probes = cascade
            .sources()
            .iter()
            .filter(|source| source.supports_listing())
            .map(|source| async move {
                let probe = source
                    .list_candidates(&ListingQuery::popular(STATUS_PROBE_LIMIT))
                    .await;
                match probe.hit {
                    Some(hit) => SourceStatus {
                        source: source.id().to_string(),
                        ok: true,
                        items: hit.value.len(),
                        route: Some(hit.route),
                        error: None,
                    },
                    None => SourceStatus {
                        source: source.id().to_string(),
                        ok: false,
                        items: 0,
                        route: None,
                        error: Some(summarize(&probe.attempts, self.settings.max_error_len)),
                    },
                }
            });
        let statuses = join_all(probes).await;
        let healthy = statuses.iter().any(|s| s.ok);

        let mut body = ResponseBody::success(statuses.into_iter().map(Item::Source).collect());
        if !healthy {
            body.ok = false;
            body.error = Some("no listing source is answering".to_string());
        }
        body
    }

    async fn listing(&self, cascade: &Cascade, listing: &ListingQuery) -> ResponseBody {
        let resolution = cascade.list(listing).await;
        let body = match &resolution {
            Resolution::Resolved {
                value, source, route, ..
            } => {
                let items = dedupe(value.clone())
                    .iter()
                    .map(|c| Item::Candidate(CandidateItem::from(c)))
                    .collect();
                ResponseBody::success(items).with_provenance(source, route)
            }
            Resolution::Unresolved { .. } => self.failure("no source returned candidates"),
        };
        self.attempts_for(body, &resolution)
    }

    async fn price(&self, cascade: &Cascade, query: &Query) -> ResponseBody {
        let label = query
            .name
            .as_deref()
            .or_else(|| query.player_id.as_ref().map(|id| id.as_str()))
            .unwrap_or_default();
        let Some(candidate) = Candidate::new(label) else {
            return self.failure("lookup key is blank");
        };
        let mut candidate = candidate.with_id(query.player_id.clone());
        if query.player_id.is_some() {
            if let Some(owner) = cascade.caller_id_owner() {
                candidate = candidate.with_origin(owner);
            }
        }

        let resolution = cascade.price(&candidate, query.platform).await;
        let body = match &resolution {
            Resolution::Resolved {
                value, source, route, ..
            } => {
                let deal = Deal {
                    evaluation: self.driver.policy().evaluate(value.coins(), query.discount),
                    candidate,
                    quote: value.clone(),
                };
                ResponseBody::success(vec![Item::Deal(DealItem::from(&deal))])
                    .with_provenance(source, route)
            }
            Resolution::Unresolved { attempts } => {
                let detail = summarize(attempts, self.settings.max_error_len);
                self.failure(&format!("price unresolved: {detail}"))
            }
        };
        self.attempts_for(body, &resolution)
    }

    async fn scan(&self, cascade: &Cascade, query: &Query) -> ResponseBody {
        let pool_size = query.size.max(self.settings.scan_pool_size);
        let resolution = cascade.list(&ListingQuery::popular(pool_size)).await;
        let Resolution::Resolved { value, source, route, .. } = resolution else {
            return self.failure("no candidates: every listing source came back empty or blocked");
        };

        let pool = dedupe(value);
        let criteria = ScanCriteria {
            platform: query.platform,
            size: query.size,
            rating: query.rating.clone(),
            price: query.price.clone(),
            discount: query.discount,
        };
        let outcome = self.driver.run(cascade, &pool, &criteria).await;
        info!(
            pool = pool.len(),
            deals = outcome.deals.len(),
            price_hits = outcome.price_hits,
            termination = ?outcome.termination,
            "Scan finished"
        );

        let items = outcome
            .deals
            .iter()
            .map(|deal| Item::Deal(DealItem::from(deal)))
            .collect();
        ResponseBody::success(items)
            .with_provenance(&source, &route)
            .with_scan(&outcome)
    }
}

/// One-line description of the attempts, for error text.
fn summarize(attempts: &[AttemptRecord], max_len: usize) -> String {
    if attempts.is_empty() {
        return "no attempts".to_string();
    }
    let text = attempts
        .iter()
        .map(|a| format!("{}: {}", a.source, a.outcome))
        .collect::<Vec<_>>()
        .join("; ");
    truncate(&text, max_len)
}
