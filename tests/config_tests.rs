use std::io::Write;

use binscout::application::cascade::ListingStrategy;
use binscout::error::{ConfigError, Error};
use binscout::infrastructure::config::settings::Config;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn config_loads_every_section() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[fetch]
delay_base_ms = 0
user_agent = "test-agent"

[policy]
rounding_step = 50
relist_fee = 0
tax_rate = 0.1

[scan]
thresholds = [2000, 1000]
min_viable = 3
concurrency = 2
listing_strategy = "merge"
prefer_origin = false
default_discount = 5

[diagnostics]
max_error_len = 80
include_attempts = false

[catalog]
enabled = true
entries = [{ name = "Custom Player", position = "ST", rating = 90 }]
"#,
    );

    let config = Config::load(file.path()).expect("valid config");

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.fetch.delay_base_ms, 0);
    assert_eq!(config.fetch.timeout_ms, 8000);
    assert_eq!(config.policy.tax_rate, dec!(0.1));
    assert_eq!(config.scan.thresholds, vec![2000, 1000]);
    assert_eq!(config.scan.listing_strategy, ListingStrategy::Merge);
    assert!(!config.scan.prefer_origin);
    assert_eq!(config.scan.default_discount, dec!(5));
    assert!(!config.diagnostics.include_attempts);
    assert_eq!(config.catalog.entries.len(), 1);
    assert_eq!(config.service_settings().max_error_len, 80);
}

#[test]
fn config_rejects_ascending_thresholds() {
    let file = write_temp_config("[scan]\nthresholds = [500, 800]\n");

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "thresholds",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid thresholds error, got {err}"),
        Ok(config) => panic!("Expected rejection, got {:?}", config.scan.thresholds),
    }
}

#[test]
fn config_rejects_unknown_log_format() {
    let file = write_temp_config("[logging]\nformat = \"xml\"\n");
    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue { field: "format", .. }))
    ));
}

#[test]
fn config_reports_missing_file() {
    let result = Config::load("/nonexistent/binscout.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn config_reports_malformed_toml() {
    let file = write_temp_config("[scan\nthresholds = ");
    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn token_is_read_from_the_named_variable() {
    std::env::set_var("BINSCOUT_TEST_TOKEN_A", "  abc  ");
    let config = Config::parse_toml(
        r#"
[[sources]]
id = "api"
bases = ["https://api.example"]
listing = ["/players"]
auth = { token_env = "BINSCOUT_TEST_TOKEN_A" }
"#,
    )
    .expect("valid config");

    let auth = config.sources[0].auth.as_ref().expect("auth");
    assert_eq!(auth.token.as_deref(), Some("abc"));
    assert_eq!(auth.header, "X-AUTH-TOKEN");
    assert_eq!(config.sources[0].auth_schemes().len(), 2);
}

#[test]
fn missing_token_leaves_the_source_without_schemes() {
    std::env::remove_var("BINSCOUT_TEST_TOKEN_B");
    let config = Config::parse_toml(
        r#"
[[sources]]
id = "api"
bases = ["https://api.example"]
listing = ["/players"]
auth = { token_env = "BINSCOUT_TEST_TOKEN_B" }
"#,
    )
    .expect("valid config");

    assert!(config.sources[0].auth_schemes().is_empty());
}
