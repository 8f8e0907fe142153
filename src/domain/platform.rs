//! Trading platforms a price can be quoted for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform whose market a price belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ps,
    Xbox,
    Pc,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ps, Platform::Xbox, Platform::Pc];

    /// Short code used in query strings and URL templates.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ps => "ps",
            Self::Xbox => "xbox",
            Self::Pc => "pc",
        }
    }

    /// Label that scrape targets print next to platform-specific prices.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ps => "PlayStation",
            Self::Xbox => "Xbox",
            Self::Pc => "PC",
        }
    }

    /// Keys a per-platform price map may use for this platform.
    #[must_use]
    pub const fn spellings(self) -> &'static [&'static str] {
        match self {
            Self::Ps => &["ps", "playstation", "ps4", "ps5"],
            Self::Xbox => &["xbox", "xb"],
            Self::Pc => &["pc", "computer"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform '{}' (expected ps, xbox or pc)", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.spellings().contains(&needle.as_str()))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_aliases() {
        assert_eq!("ps".parse::<Platform>().unwrap(), Platform::Ps);
        assert_eq!("PlayStation".parse::<Platform>().unwrap(), Platform::Ps);
        assert_eq!("XB".parse::<Platform>().unwrap(), Platform::Xbox);
        assert_eq!(" pc ".parse::<Platform>().unwrap(), Platform::Pc);
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = "switch".parse::<Platform>().unwrap_err();
        assert!(err.to_string().contains("switch"));
    }

    #[test]
    fn code_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(platform.code().parse::<Platform>().unwrap(), platform);
        }
    }
}
