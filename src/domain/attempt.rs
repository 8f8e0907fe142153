//! Diagnostic trail of source/route attempts for one logical lookup.

use std::fmt;

use serde::Serialize;

/// What happened when one route was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum AttemptOutcome {
    /// The route produced a usable value.
    Resolved,
    /// The route answered but nothing usable could be extracted.
    Empty,
    /// Connection, DNS or timeout failure.
    Network(String),
    /// Non-success status other than an auth rejection.
    Http(u16),
    /// 401/403 for the credential scheme used on this attempt.
    AuthRejected(u16),
    /// The body could not be decoded in the expected format.
    Parse(String),
    /// The route was not attempted.
    Skipped(String),
}

impl AttemptOutcome {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => f.write_str("resolved"),
            Self::Empty => f.write_str("empty"),
            Self::Network(msg) => write!(f, "network: {msg}"),
            Self::Http(status) => write!(f, "http {status}"),
            Self::AuthRejected(status) => write!(f, "auth rejected ({status})"),
            Self::Parse(msg) => write!(f, "parse: {msg}"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// One consulted source/route and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub source: String,
    pub route: String,
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    pub fn new(source: impl Into<String>, route: impl Into<String>, outcome: AttemptOutcome) -> Self {
        Self {
            source: source.into(),
            route: route.into(),
            outcome,
        }
    }
}
