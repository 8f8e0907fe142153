//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; every section is optional.
//! Source credentials are never read from the file: each `[sources.auth]`
//! names the environment variable holding its token.
//!
//! # Example
//!
//! ```no_run
//! use binscout::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("binscout.toml")?;
//!     config.init_logging(0);
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::policy::PolicyConfig;
use super::scan::{service_settings, DiagnosticsConfig, ScanConfig};
use crate::adapter::outbound::http::FetchConfig;
use crate::adapter::outbound::source::builtin::{builtin_sources, default_catalog};
use crate::adapter::outbound::source::definition::PLACEHOLDERS;
use crate::adapter::outbound::source::{CatalogEntry, SourceDefinition};
use crate::application::service::ServiceSettings;
use crate::domain::max_tax_rate;
use crate::error::{ConfigError, Result};

/// Static fallback catalog, `[catalog]`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Append the catalog as the last listing source.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_catalog")]
    pub entries: Vec<CatalogEntry>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            entries: default_catalog(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Both resolve source tokens and validate.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Politeness delay, timeouts and user agent.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Deal evaluation constants.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Threshold relaxation and cascade behaviour.
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Sources in priority order. Empty means the built-in set.
    #[serde(default)]
    pub sources: Vec<SourceDefinition>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Reads source tokens from the environment variables the sources name.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., thresholds not descending)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if config.sources.is_empty() {
            config.sources = builtin_sources();
        }
        for source in &mut config.sources {
            if let Some(auth) = source.auth.as_mut() {
                auth.resolve_token();
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when given, otherwise the defaults with built-in sources.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    #[allow(clippy::result_large_err)]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::parse_toml(""),
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("format", "must be 'pretty' or 'json'"));
        }

        if self.fetch.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than 0"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "user_agent",
            }
            .into());
        }

        if self.policy.rounding_step == 0 {
            return Err(invalid("rounding_step", "must be greater than 0"));
        }
        if self.policy.tax_rate < Decimal::ZERO || self.policy.tax_rate >= max_tax_rate() {
            return Err(invalid("tax_rate", format!("must be in [0, {})", max_tax_rate())));
        }

        let scan = &self.scan;
        if scan.thresholds.is_empty() {
            return Err(ConfigError::MissingField {
                field: "thresholds",
            }
            .into());
        }
        if scan.thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(invalid("thresholds", "must be strictly descending"));
        }
        if scan.min_viable == 0 {
            return Err(invalid("min_viable", "must be greater than 0"));
        }
        if scan.concurrency == 0 {
            return Err(invalid("concurrency", "must be greater than 0"));
        }
        if scan.pool_size == 0 {
            return Err(invalid("pool_size", "must be greater than 0"));
        }
        if scan.default_discount < Decimal::ZERO || scan.default_discount >= Decimal::ONE_HUNDRED {
            return Err(invalid("default_discount", "must be in [0, 100)"));
        }

        if self.diagnostics.max_error_len == 0 {
            return Err(invalid("max_error_len", "must be greater than 0"));
        }

        let mut ids = HashSet::new();
        for source in &self.sources {
            validate_source(source)?;
            if !ids.insert(source.id.as_str()) {
                return Err(invalid("sources", format!("duplicate source id '{}'", source.id)));
            }
        }
        Ok(())
    }

    /// Sources that take part in the cascade.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceDefinition> {
        self.sources.iter().filter(|s| s.enabled)
    }

    /// Service knobs derived from `[scan]` and `[diagnostics]`.
    #[must_use]
    pub fn service_settings(&self) -> ServiceSettings {
        service_settings(&self.scan, &self.diagnostics)
    }

    /// Initialize logging; `verbose` is the `-v` count.
    pub fn init_logging(&self, verbose: u8) {
        self.logging.init(verbose);
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn validate_source(source: &SourceDefinition) -> Result<()> {
    if source.id.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "id" }.into());
    }
    if source.bases.is_empty() {
        return Err(invalid("bases", format!("source '{}' has no base URL", source.id)));
    }
    for base in &source.bases {
        let parsed = Url::parse(base)
            .map_err(|e| invalid("bases", format!("'{base}' in source '{}': {e}", source.id)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("bases", format!("'{base}' must be http or https")));
        }
    }
    for template in source.templates() {
        if let Some(unknown) = template.placeholders().find(|p| !PLACEHOLDERS.contains(p)) {
            return Err(invalid(
                "sources",
                format!("unknown placeholder '{{{unknown}}}' in '{}'", template.path),
            ));
        }
    }
    if let Some(auth) = &source.auth {
        if auth.token_env.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "token_env" }.into());
        }
    }
    Ok(())
}
