//! Sources used when the configuration declares none.
//!
//! Priority is declaration order: the structured catalog API first, then the
//! primary scrape target, then the secondary aggregator.

use super::catalog::CatalogEntry;
use super::definition::{AuthConfig, RouteTemplate, SourceDefinition};

pub const FUTDB_TOKEN_ENV: &str = "FUTDB_API_KEY";

const JSON_ACCEPT: &str = "application/json";
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Structured catalog API behind a token.
#[must_use]
pub fn futdb() -> SourceDefinition {
    let search = [
        "/players?search={query}&limit={limit}",
        "/fc/players?search={query}&limit={limit}",
        "/search/players?name={query}&limit={limit}",
        "/fc/search/players?name={query}&limit={limit}",
    ];
    let price = [
        "/players/{id}/price?platform={platform}",
        "/players/{id}/prices?platform={platform}",
        "/prices/{platform}/{id}",
        "/fc/players/{id}/price?platform={platform}",
        "/fc/players/{id}/prices?platform={platform}",
        "/fc/prices/{platform}/{id}",
    ];
    SourceDefinition {
        id: "futdb".into(),
        bases: vec![
            "https://api.futdatabase.com/api".into(),
            "https://api.futdatabase.com/api/fc".into(),
        ],
        accept: Some(JSON_ACCEPT.into()),
        auth: Some(AuthConfig::from_env(FUTDB_TOKEN_ENV)),
        listing: vec![
            RouteTemplate::json("/players?page={page}&limit={limit}"),
            RouteTemplate::json("/fc/players?page={page}&limit={limit}"),
        ],
        search: search.into_iter().map(RouteTemplate::json).collect(),
        price: price.into_iter().map(RouteTemplate::json).collect(),
        caller_ids: true,
        enabled: true,
    }
}

/// Primary scrape target.
#[must_use]
pub fn futgg() -> SourceDefinition {
    SourceDefinition {
        id: "futgg".into(),
        bases: vec!["https://www.fut.gg".into()],
        accept: Some(HTML_ACCEPT.into()),
        auth: None,
        listing: vec![
            RouteTemplate::markup("/players/trending/"),
            RouteTemplate::markup("/players/?popular"),
        ],
        search: vec![RouteTemplate::markup("/players/?name={query}")],
        price: vec![RouteTemplate::markup("/players/{id}/")],
        caller_ids: false,
        enabled: true,
    }
}

/// Secondary aggregator.
#[must_use]
pub fn futbin() -> SourceDefinition {
    SourceDefinition {
        id: "futbin".into(),
        bases: vec!["https://www.futbin.com".into()],
        accept: Some(HTML_ACCEPT.into()),
        auth: None,
        listing: vec![RouteTemplate::markup("/popular")],
        search: Vec::new(),
        price: vec![RouteTemplate::markup("/26/player/{id}")],
        caller_ids: false,
        enabled: true,
    }
}

/// All built-in sources in priority order.
#[must_use]
pub fn builtin_sources() -> Vec<SourceDefinition> {
    vec![futdb(), futgg(), futbin()]
}

/// Frequently traded cards offered by the static catalog.
#[must_use]
pub fn default_catalog() -> Vec<CatalogEntry> {
    [
        ("Kylian Mbappe", "ST", 91),
        ("Erling Haaland", "ST", 91),
        ("Vinicius Junior", "LW", 89),
        ("Mohamed Salah", "RW", 89),
        ("Jude Bellingham", "CM", 87),
        ("Jamal Musiala", "CAM", 86),
        ("Ousmane Dembele", "RW", 86),
        ("Heung Min Son", "LW", 88),
        ("Marcus Rashford", "LW", 85),
        ("Raphael Varane", "CB", 85),
        ("Theo Hernandez", "LB", 85),
        ("Kyle Walker", "RB", 84),
        ("Ferland Mendy", "LB", 83),
        ("Mike Maignan", "GK", 87),
    ]
    .into_iter()
    .map(|(name, position, rating)| CatalogEntry::new(name, position, rating))
    .collect()
}
