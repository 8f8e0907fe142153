//! Composition root: wires configuration into a ready [`ScoutService`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::http::PoliteFetcher;
use crate::adapter::outbound::source::{StaticCatalog, TableSource};
use crate::application::cascade::Cascade;
use crate::application::relax::RelaxationDriver;
use crate::application::service::ScoutService;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::fetch::Fetcher;
use crate::port::outbound::source::SourceAdapter;

/// Build the source list in priority order.
///
/// Token-protected sources whose token is missing are kept; they record a
/// skipped attempt instead of fetching.
#[must_use]
pub fn build_sources(config: &Config, fetcher: &Arc<dyn Fetcher>) -> Vec<Arc<dyn SourceAdapter>> {
    let mut sources: Vec<Arc<dyn SourceAdapter>> = Vec::new();
    for definition in config.enabled_sources() {
        if definition.auth_schemes().is_empty() {
            if let Some(auth) = &definition.auth {
                warn!(source = %definition.id, env = %auth.token_env, "Token not set, source will be skipped");
            }
        }
        sources.push(Arc::new(TableSource::new(
            definition.clone(),
            Arc::clone(fetcher),
        )));
    }

    if config.catalog.enabled {
        let catalog = StaticCatalog::new(&config.catalog.entries);
        info!(entries = catalog.len(), "Static catalog enabled");
        sources.push(Arc::new(catalog));
    }
    sources
}

/// Build the service over an explicit fetcher.
///
/// # Errors
///
/// Fails when the configured deal policy is invalid.
#[allow(clippy::result_large_err)]
pub fn build_service_with(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<ScoutService> {
    let sources = build_sources(config, &fetcher);
    info!(
        sources = %sources.iter().map(|s| s.id()).collect::<Vec<_>>().join(","),
        "Sources configured"
    );

    let cascade = Cascade::new(sources)
        .with_strategy(config.scan.listing_strategy)
        .with_prefer_origin(config.scan.prefer_origin);
    let driver = RelaxationDriver::new(
        config.policy.to_policy()?,
        config.scan.thresholds.clone(),
        config.scan.min_viable,
    )
    .with_concurrency(config.scan.concurrency)
    .with_trust_inferred_rating(config.scan.trust_inferred_rating);

    Ok(ScoutService::new(cascade, driver, config.service_settings()))
}

/// Build the service over the real HTTP fetcher.
///
/// # Errors
///
/// Fails when the configured deal policy is invalid.
#[allow(clippy::result_large_err)]
pub fn build_service(config: &Config) -> Result<ScoutService> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(PoliteFetcher::from_config(&config.fetch));
    build_service_with(config, fetcher)
}
