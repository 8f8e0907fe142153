//! Rate-limited HTTP fetcher.
//!
//! Waits a randomized interval before each request and presents a browser
//! user agent, which keeps scrape targets from flagging the traffic. There
//! are no retries here: callers move on to the next route instead.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::settings::FetchConfig;
use crate::port::outbound::fetch::{FetchError, FetchRequest, Fetcher, RawResponse};

/// [`Fetcher`] backed by `reqwest` with a politeness delay.
pub struct PoliteFetcher {
    http: HttpClient,
    delay_base_ms: u64,
    delay_jitter_ms: u64,
}

impl PoliteFetcher {
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            delay_base_ms: config.delay_base_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        }
    }

    fn politeness_delay(&self) -> Duration {
        let jitter = if self.delay_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.delay_jitter_ms)
        };
        Duration::from_millis(self.delay_base_ms.saturating_add(jitter))
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> FetchError {
    let message = if err.is_timeout() {
        "timed out".to_string()
    } else {
        err.to_string()
    };
    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

#[async_trait]
impl Fetcher for PoliteFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<RawResponse, FetchError> {
        let delay = self.politeness_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let mut builder = self.http.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| network_error(&request.url, &err))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %request.url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::Http {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| network_error(&request.url, &err))?;
        debug!(url = %request.url, bytes = body.len(), "Fetched");

        Ok(RawResponse {
            url: request.url.clone(),
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_within_bounds() {
        let fetcher = PoliteFetcher::from_config(&FetchConfig {
            delay_base_ms: 50,
            delay_jitter_ms: 25,
            ..FetchConfig::default()
        });
        for _ in 0..100 {
            let delay = fetcher.politeness_delay();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(75));
        }
    }

    #[test]
    fn huge_delays_saturate() {
        let fetcher = PoliteFetcher::from_config(&FetchConfig {
            delay_base_ms: u64::MAX,
            delay_jitter_ms: u64::MAX,
            ..FetchConfig::default()
        });
        assert_eq!(fetcher.politeness_delay(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn zero_delay_when_disabled() {
        let fetcher = PoliteFetcher::from_config(&FetchConfig {
            delay_base_ms: 0,
            delay_jitter_ms: 0,
            ..FetchConfig::default()
        });
        assert!(fetcher.politeness_delay().is_zero());
    }
}
