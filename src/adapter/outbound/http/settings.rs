//! Outbound HTTP client configuration.

use serde::Deserialize;

/// Browser identity presented to every source.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Politeness and timeout settings for the fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Fixed delay before every request in milliseconds.
    #[serde(default = "default_delay_base_ms")]
    pub delay_base_ms: u64,
    /// Upper bound of the random delay added on top of the base.
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_delay_base_ms() -> u64 {
    80
}

const fn default_delay_jitter_ms() -> u64 {
    120
}

const fn default_timeout_ms() -> u64 {
    8000
}

const fn default_connect_timeout_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_base_ms: default_delay_base_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}
