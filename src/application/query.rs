//! Inbound query parsing.
//!
//! Turns a loose parameter bag into a validated [`Query`]. Anything that
//! cannot be served as asked becomes a [`RequestError`].

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{CandidateId, Platform, UnknownPlatform, MAX_RATING};
use crate::error::RequestError;

pub const MIN_SIZE: usize = 1;
pub const MAX_SIZE: usize = 200;
pub const DEFAULT_SIZE: usize = 50;
pub const DEFAULT_BIN_MAX: u64 = 9_999_999;

/// Raw query parameters.
pub type Params = HashMap<String, String>;

/// Operation requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Probe every listing source.
    Status,
    /// Popular candidates.
    List,
    /// Candidates matching a name.
    Find,
    /// One price lookup.
    Price,
    /// Combined deal scan.
    Scan,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::List => "list",
            Self::Find => "find",
            Self::Price => "price",
            Self::Scan => "scan",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" | "test" => Ok(Self::Status),
            "list" | "players" => Ok(Self::List),
            "find" | "search" => Ok(Self::Find),
            "price" => Ok(Self::Price),
            "scan" | "deals" => Ok(Self::Scan),
            other => Err(RequestError::UnknownMode(other.to_string())),
        }
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub mode: Mode,
    pub platform: Platform,
    pub size: usize,
    pub rating: RangeInclusive<u8>,
    pub price: RangeInclusive<u64>,
    pub discount: Decimal,
    pub name: Option<String>,
    pub player_id: Option<CandidateId>,
    /// Restrict the cascade to one source.
    pub source: Option<String>,
    pub page: u32,
    /// Listing size; defaults to `size`.
    pub limit: Option<usize>,
}

impl Query {
    /// Parse a parameter bag. `default_discount` applies when `discount` is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] for a missing or unknown mode, unparsable
    /// numbers, inverted bounds, a discount outside `[0, 100)`, an unknown
    /// platform, or a lookup mode without its key.
    pub fn parse(params: &Params, default_discount: Decimal) -> Result<Self, RequestError> {
        let get = |key: &str| params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let mode: Mode = get("mode").ok_or(RequestError::MissingParameter("mode"))?.parse()?;
        let platform = match get("platform") {
            Some(raw) => raw.parse().map_err(|e: UnknownPlatform| {
                RequestError::InvalidParameter {
                    name: "platform",
                    reason: e.to_string(),
                }
            })?,
            None => Platform::default(),
        };

        let size = number::<usize>(get("size"), "size")?
            .unwrap_or(DEFAULT_SIZE)
            .clamp(MIN_SIZE, MAX_SIZE);
        let limit = number::<usize>(get("limit"), "limit")?.map(|l| l.clamp(MIN_SIZE, MAX_SIZE));
        let page = number::<u32>(get("page"), "page")?.unwrap_or(1);
        if page == 0 {
            return Err(invalid("page", "must be at least 1"));
        }

        let ovr_min = number::<u8>(get("ovrMin"), "ovrMin")?.unwrap_or(0);
        let ovr_max = number::<u8>(get("ovrMax"), "ovrMax")?.unwrap_or(MAX_RATING);
        if ovr_max > MAX_RATING {
            return Err(invalid("ovrMax", format!("must be at most {MAX_RATING}")));
        }
        if ovr_min > ovr_max {
            return Err(invalid("ovrMin", "must not exceed ovrMax"));
        }

        let bin_min = number::<u64>(get("binMin"), "binMin")?.unwrap_or(0);
        let bin_max = number::<u64>(get("binMax"), "binMax")?.unwrap_or(DEFAULT_BIN_MAX);
        if bin_min > bin_max {
            return Err(invalid("binMin", "must not exceed binMax"));
        }

        let discount = number::<Decimal>(get("discount"), "discount")?.unwrap_or(default_discount);
        if discount < Decimal::ZERO || discount >= Decimal::ONE_HUNDRED {
            return Err(invalid("discount", "must be in [0, 100)"));
        }

        let name = get("name").map(str::to_string);
        let player_id = get("playerId").and_then(CandidateId::new);
        let source = get("source").map(str::to_ascii_lowercase);

        match mode {
            Mode::Find if name.is_none() => return Err(RequestError::MissingParameter("name")),
            Mode::Price if name.is_none() && player_id.is_none() => {
                return Err(RequestError::MissingParameter("playerId"));
            }
            _ => {}
        }

        Ok(Self {
            mode,
            platform,
            size,
            rating: ovr_min..=ovr_max,
            price: bin_min..=bin_max,
            discount,
            name,
            player_id,
            source,
            page,
            limit,
        })
    }

    /// Listing size for list/find.
    #[must_use]
    pub fn listing_limit(&self) -> usize {
        self.limit.unwrap_or(self.size)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> RequestError {
    RequestError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn number<T: FromStr>(raw: Option<&str>, name: &'static str) -> Result<Option<T>, RequestError> {
    raw.map(|v| {
        v.parse::<T>()
            .map_err(|_| invalid(name, format!("'{v}' is not a valid number")))
    })
    .transpose()
}
