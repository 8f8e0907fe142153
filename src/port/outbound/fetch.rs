//! Outbound fetch port.
//!
//! Every request the engine makes goes through a [`Fetcher`]. Failures are
//! classified into exactly three kinds so that callers can branch on them
//! (in particular on 401/403) without inspecting transport internals.

use async_trait::async_trait;
use thiserror::Error;

/// A GET request to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header with this name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Classified fetch failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS or timeout failure; nothing was received.
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// A response arrived with a non-success status.
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    /// The body could not be interpreted in the expected format.
    #[error("unreadable body from {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// Status code when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } | Self::Parse { .. } => None,
        }
    }

    /// True for 401/403: the route is reachable but rejected the credentials.
    #[must_use]
    pub const fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Issues outbound GET requests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a URL, returning the body of a 2xx response.
    async fn fetch(&self, request: &FetchRequest) -> Result<RawResponse, FetchError>;

    /// Fetch and decode a JSON body.
    async fn fetch_json(&self, request: &FetchRequest) -> Result<serde_json::Value, FetchError> {
        let raw = self.fetch(request).await?;
        serde_json::from_str(&raw.body).map_err(|e| FetchError::Parse {
            url: raw.url,
            message: e.to_string(),
        })
    }

    /// Fetch a markup/text body. Empty bodies count as unreadable.
    async fn fetch_text(&self, request: &FetchRequest) -> Result<String, FetchError> {
        let raw = self.fetch(request).await?;
        if raw.body.trim().is_empty() {
            return Err(FetchError::Parse {
                url: raw.url,
                message: "empty body".into(),
            });
        }
        Ok(raw.body)
    }
}
