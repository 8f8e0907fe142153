//! Canonical test configurations.

use crate::adapter::outbound::http::FetchConfig;
use crate::infrastructure::config::settings::Config;

/// Fetch settings with no politeness delay and a short timeout.
pub fn fast_fetch() -> FetchConfig {
    FetchConfig {
        delay_base_ms: 0,
        delay_jitter_ms: 0,
        timeout_ms: 500,
        connect_timeout_ms: 500,
        ..FetchConfig::default()
    }
}

/// Parse `toml` into a validated config.
///
/// # Panics
///
/// Panics when the config is rejected.
pub fn config_from(toml: &str) -> Config {
    Config::parse_toml(toml).unwrap_or_else(|e| panic!("test config rejected: {e}"))
}
