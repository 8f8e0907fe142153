//! Scripted [`Fetcher`] for exercising sources without a network.
//!
//! Responses are keyed by exact URL. A rule may additionally require a
//! header to be present, which is how auth-scheme fallbacks are scripted.
//! Unscripted URLs answer 404.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::port::outbound::fetch::{FetchError, FetchRequest, Fetcher, RawResponse};

enum Reply {
    Status(u16, String),
    Network(String),
}

struct Rule {
    url: String,
    header: Option<String>,
    reply: Reply,
}

/// A fetcher answering from a fixed script and recording every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    rules: Mutex<Vec<Rule>>,
    log: Mutex<Vec<FetchRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, header: Option<&str>, reply: Reply) {
        self.rules
            .lock()
            .expect("rules lock poisoned")
            .push(Rule {
                url: url.to_string(),
                header: header.map(str::to_string),
                reply,
            });
    }

    /// Answer `url` with a 200 JSON body.
    pub fn respond_json(&self, url: &str, body: &str) {
        self.push(url, None, Reply::Status(200, body.to_string()));
    }

    /// Answer `url` with a 200 markup body.
    pub fn respond_text(&self, url: &str, body: &str) {
        self.push(url, None, Reply::Status(200, body.to_string()));
    }

    /// Answer `url` with a bodiless status.
    pub fn respond_status(&self, url: &str, status: u16) {
        self.push(url, None, Reply::Status(status, String::new()));
    }

    /// Answer `url` only when the request carries `header`.
    pub fn respond_with_header(&self, url: &str, header: &str, status: u16, body: &str) {
        self.push(url, Some(header), Reply::Status(status, body.to_string()));
    }

    /// Fail `url` as if the connection dropped.
    pub fn fail_network(&self, url: &str, message: &str) {
        self.push(url, None, Reply::Network(message.to_string()));
    }

    /// Every request issued so far, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.log.lock().expect("log lock poisoned").clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().expect("log lock poisoned").len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<RawResponse, FetchError> {
        self.log
            .lock()
            .expect("log lock poisoned")
            .push(request.clone());

        let rules = self.rules.lock().expect("rules lock poisoned");
        let rule = rules.iter().find(|rule| {
            rule.url == request.url
                && rule
                    .header
                    .as_deref()
                    .map_or(true, |h| request.header_value(h).is_some())
        });

        match rule.map(|r| &r.reply) {
            Some(Reply::Network(message)) => Err(FetchError::Network {
                url: request.url.clone(),
                message: message.clone(),
            }),
            Some(Reply::Status(status, body)) if (200..300).contains(status) => Ok(RawResponse {
                url: request.url.clone(),
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Status(status, _)) => Err(FetchError::Http {
                url: request.url.clone(),
                status: *status,
            }),
            None => Err(FetchError::Http {
                url: request.url.clone(),
                status: 404,
            }),
        }
    }
}
