use thiserror::Error;

use crate::domain::PolicyError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A caller request that cannot be served as asked.
///
/// This is the only failure that is reported back as a rejected request;
/// everything downstream degrades to empty or partial results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown mode '{0}'")]
    UnknownMode(String),
}

/// Failures while assembling the service from configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid deal policy: {0}")]
    Policy(#[from] PolicyError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DealPolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn config_and_policy_failures_convert() {
        let err: Error = ConfigError::MissingField { field: "id" }.into();
        assert_eq!(err.to_string(), "missing required field: id");

        let policy = DealPolicy::new(0, 1000, dec!(0.05)).unwrap_err();
        let err: Error = policy.into();
        assert!(matches!(err, Error::Policy(_)));
        assert!(err.to_string().starts_with("invalid deal policy"));
    }
}
