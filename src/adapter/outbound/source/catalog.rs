//! Curated candidate list used as a last-resort listing.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{normalize_name, AttemptOutcome, AttemptRecord, Candidate, Platform};
use crate::port::outbound::source::{ListingQuery, Probe, SourceAdapter};

pub const CATALOG_SOURCE_ID: &str = "catalog";

/// One configured catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
}

impl CatalogEntry {
    pub fn new(name: &str, position: &str, rating: u32) -> Self {
        Self {
            name: name.to_string(),
            position: Some(position.to_string()),
            rating: Some(rating),
        }
    }
}

/// Listing-only source answering from a fixed list.
pub struct StaticCatalog {
    candidates: Vec<Candidate>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(entries: &[CatalogEntry]) -> Self {
        let candidates = entries
            .iter()
            .filter_map(|entry| {
                Candidate::new(&entry.name).map(|c| {
                    c.with_position(entry.position.clone())
                        .with_rating(entry.rating)
                })
            })
            .collect();
        Self { candidates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[async_trait]
impl SourceAdapter for StaticCatalog {
    fn id(&self) -> &str {
        CATALOG_SOURCE_ID
    }

    fn supports_listing(&self) -> bool {
        true
    }

    fn supports_pricing(&self) -> bool {
        false
    }

    async fn list_candidates(&self, query: &ListingQuery) -> Probe<Vec<Candidate>> {
        let wanted = query.search.as_deref().map(normalize_name);
        let found: Vec<Candidate> = self
            .candidates
            .iter()
            .filter(|c| {
                wanted
                    .as_deref()
                    .map_or(true, |w| normalize_name(c.name()).contains(w))
            })
            .take(query.limit)
            .cloned()
            .collect();

        let outcome = if found.is_empty() {
            AttemptOutcome::Empty
        } else {
            AttemptOutcome::Resolved
        };
        let attempts = vec![AttemptRecord::new(CATALOG_SOURCE_ID, "static", outcome)];
        if found.is_empty() {
            Probe::miss(attempts)
        } else {
            Probe::hit(found, "static", attempts)
        }
    }

    async fn resolve_price(&self, _candidate: &Candidate, _platform: Platform) -> Probe<u64> {
        Probe::miss(vec![AttemptRecord::new(
            CATALOG_SOURCE_ID,
            "static",
            AttemptOutcome::Skipped("catalog carries no prices".into()),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(&[
            CatalogEntry::new("Kylian Mbappe", "ST", 91),
            CatalogEntry::new("Mike Maignan", "GK", 87),
            CatalogEntry {
                name: "  ".into(),
                position: None,
                rating: None,
            },
        ])
    }

    #[tokio::test]
    async fn lists_entries_up_to_limit() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        let probe = catalog.list_candidates(&ListingQuery::popular(1)).await;
        let hit = probe.hit.unwrap();
        assert_eq!(hit.value.len(), 1);
        assert_eq!(hit.value[0].rating(), Some(91));
        assert_eq!(hit.value[0].origin(), None);
    }

    #[tokio::test]
    async fn search_filters_by_normalized_name() {
        let probe = catalog()
            .list_candidates(&ListingQuery::search("maignan", 10))
            .await;
        assert_eq!(probe.hit.unwrap().value[0].position(), Some("GK"));

        let miss = catalog()
            .list_candidates(&ListingQuery::search("nobody", 10))
            .await;
        assert!(miss.hit.is_none());
    }
}
