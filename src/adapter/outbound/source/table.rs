//! Generic route-table executor.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use super::definition::{AuthScheme, PayloadFormat, RouteTemplate, RouteVars, SourceDefinition};
use crate::adapter::outbound::normalize::{
    extract_listing, extract_price, normalize_listing, normalize_price,
};
use crate::domain::{
    normalize_name, AttemptOutcome, AttemptRecord, Candidate, CandidateId, Platform,
};
use crate::port::outbound::fetch::{FetchError, FetchRequest, Fetcher};
use crate::port::outbound::source::{ListingQuery, Probe, Routed, SourceAdapter};

/// Results requested when searching for a candidate's id.
const ID_SEARCH_LIMIT: usize = 10;

/// A decoded response body.
enum Body {
    Json(Value),
    Markup(String),
}

/// [`SourceAdapter`] driven entirely by a [`SourceDefinition`].
///
/// Routes are tried base-major: every template against the first base, then
/// every template against the second. Within a route, credential schemes are
/// tried in order and the next scheme is used only after a 401/403.
pub struct TableSource {
    definition: SourceDefinition,
    fetcher: Arc<dyn Fetcher>,
}

impl TableSource {
    pub fn new(definition: SourceDefinition, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            definition,
            fetcher,
        }
    }

    #[must_use]
    pub fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    fn request(&self, url: &str, scheme: &AuthScheme) -> FetchRequest {
        let mut request = FetchRequest::get(url);
        if let Some(accept) = &self.definition.accept {
            request = request.header("Accept", accept.as_str());
        }
        let token = self
            .definition
            .auth
            .as_ref()
            .and_then(|auth| auth.token.as_deref());
        match (scheme, token) {
            (AuthScheme::HeaderToken { header }, Some(token)) => {
                request.header(header.as_str(), token)
            }
            (AuthScheme::Bearer, Some(token)) => {
                request.header("Authorization", format!("Bearer {token}"))
            }
            _ => request,
        }
    }

    async fn fetch_body(&self, request: &FetchRequest, format: PayloadFormat) -> Result<Body, FetchError> {
        match format {
            PayloadFormat::Json => self.fetcher.fetch_json(request).await.map(Body::Json),
            PayloadFormat::Markup => self.fetcher.fetch_text(request).await.map(Body::Markup),
        }
    }

    /// Walk `routes` over every base until `decode` accepts a body.
    async fn first_hit<T, F>(
        &self,
        routes: &[RouteTemplate],
        vars: &RouteVars<'_>,
        attempts: &mut Vec<AttemptRecord>,
        decode: F,
    ) -> Option<Routed<T>>
    where
        F: Fn(Body) -> Option<T> + Send + Sync,
        T: Send,
    {
        let source = self.definition.id.as_str();
        let schemes = self.definition.auth_schemes();
        if schemes.is_empty() {
            let env = self
                .definition
                .auth
                .as_ref()
                .map_or("token", |auth| auth.token_env.as_str());
            attempts.push(AttemptRecord::new(
                source,
                "*",
                AttemptOutcome::Skipped(format!("{env} not set")),
            ));
            return None;
        }

        for base in &self.definition.bases {
            for template in routes {
                let Some(path) = template.render(vars) else {
                    attempts.push(AttemptRecord::new(
                        source,
                        format!("{base}{}", template.path),
                        AttemptOutcome::Skipped("no usable id".into()),
                    ));
                    continue;
                };
                let url = format!("{}{path}", base.trim_end_matches('/'));

                for scheme in &schemes {
                    let route = match scheme {
                        AuthScheme::Anonymous => url.clone(),
                        other => format!("{url} [{}]", other.label()),
                    };
                    let request = self.request(&url, scheme);
                    trace!(source, route = %route, "Trying route");

                    let outcome = match self.fetch_body(&request, template.format).await {
                        Ok(body) => match decode(body) {
                            Some(value) => {
                                debug!(source, route = %route, "Route resolved");
                                attempts.push(AttemptRecord::new(
                                    source,
                                    route.as_str(),
                                    AttemptOutcome::Resolved,
                                ));
                                return Some(Routed { value, route });
                            }
                            None => AttemptOutcome::Empty,
                        },
                        Err(err) if err.is_auth_rejection() => {
                            let status = err.status().unwrap_or_default();
                            attempts.push(AttemptRecord::new(
                                source,
                                route,
                                AttemptOutcome::AuthRejected(status),
                            ));
                            continue;
                        }
                        Err(FetchError::Http { status, .. }) => AttemptOutcome::Http(status),
                        Err(FetchError::Network { message, .. }) => AttemptOutcome::Network(message),
                        Err(FetchError::Parse { message, .. }) => AttemptOutcome::Parse(message),
                    };
                    debug!(source, route = %route, outcome = %outcome, "Route missed");
                    attempts.push(AttemptRecord::new(source, route, outcome));
                    break;
                }
            }
        }
        None
    }

    /// Find this source's own id for `name` through its search routes.
    async fn lookup_id(&self, name: &str, attempts: &mut Vec<AttemptRecord>) -> Option<CandidateId> {
        if self.definition.search.is_empty() {
            return None;
        }
        let vars = RouteVars {
            page: 1,
            limit: ID_SEARCH_LIMIT,
            query: Some(name),
            ..RouteVars::default()
        };
        let wanted = normalize_name(name);
        let hit = self
            .first_hit(&self.definition.search, &vars, attempts, |body| {
                let found = decode_listing(body, ID_SEARCH_LIMIT);
                let exact = found
                    .iter()
                    .find(|c| c.id().is_some() && normalize_name(c.name()) == wanted);
                exact
                    .or_else(|| found.iter().find(|c| c.id().is_some()))
                    .and_then(|c| c.id().cloned())
            })
            .await?;
        debug!(source = %self.definition.id, candidate = name, id = %hit.value, "Resolved id by search");
        Some(hit.value)
    }
}

fn decode_listing(body: Body, limit: usize) -> Vec<Candidate> {
    match body {
        Body::Json(value) => normalize_listing(&value, limit),
        Body::Markup(html) => extract_listing(&html, limit),
    }
}

#[async_trait]
impl SourceAdapter for TableSource {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn supports_listing(&self) -> bool {
        !self.definition.listing.is_empty() || !self.definition.search.is_empty()
    }

    fn supports_pricing(&self) -> bool {
        !self.definition.price.is_empty()
    }

    fn accepts_caller_ids(&self) -> bool {
        self.definition.caller_ids
    }

    async fn list_candidates(&self, query: &ListingQuery) -> Probe<Vec<Candidate>> {
        let mut attempts = Vec::new();
        let routes = if query.search.is_some() {
            &self.definition.search
        } else {
            &self.definition.listing
        };
        if routes.is_empty() {
            attempts.push(AttemptRecord::new(
                self.id(),
                "*",
                AttemptOutcome::Skipped("no routes for this listing".into()),
            ));
            return Probe::miss(attempts);
        }

        let vars = RouteVars {
            page: query.page,
            limit: query.limit,
            query: query.search.as_deref(),
            ..RouteVars::default()
        };
        let origin = self.definition.id.clone();
        let limit = query.limit;
        let hit = self
            .first_hit(routes, &vars, &mut attempts, |body| {
                let found: Vec<Candidate> = decode_listing(body, limit)
                    .into_iter()
                    .map(|c| c.with_origin(origin.as_str()))
                    .collect();
                (!found.is_empty()).then_some(found)
            })
            .await;

        match hit {
            Some(Routed { value, route }) => Probe::hit(value, route, attempts),
            None => Probe::miss(attempts),
        }
    }

    async fn resolve_price(&self, candidate: &Candidate, platform: Platform) -> Probe<u64> {
        let mut attempts = Vec::new();
        let needs_id = self.definition.price.iter().any(|t| t.uses("id"));

        let mut id = candidate.id_usable_by(self.id()).cloned();
        if id.is_none() && needs_id && candidate.has_searchable_name() {
            id = self.lookup_id(candidate.name(), &mut attempts).await;
        }

        let vars = RouteVars {
            page: 1,
            limit: ID_SEARCH_LIMIT,
            query: Some(candidate.name()),
            id: id.as_ref().map(CandidateId::as_str),
            platform: Some(platform),
        };
        let hit = self
            .first_hit(&self.definition.price, &vars, &mut attempts, |body| match body {
                Body::Json(value) => normalize_price(&value, platform),
                Body::Markup(html) => extract_price(&html, platform),
            })
            .await;

        match hit {
            Some(Routed { value, route }) => Probe::hit(value, route, attempts),
            None => Probe::miss(attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::source::definition::AuthConfig;
    use crate::testkit::fetcher::ScriptedFetcher;

    fn source(def: SourceDefinition, fetcher: &Arc<ScriptedFetcher>) -> TableSource {
        TableSource::new(def, Arc::clone(fetcher) as Arc<dyn Fetcher>)
    }

    fn plain(id: &str, bases: &[&str]) -> SourceDefinition {
        SourceDefinition {
            id: id.into(),
            bases: bases.iter().map(|b| (*b).to_string()).collect(),
            accept: None,
            auth: None,
            listing: Vec::new(),
            search: Vec::new(),
            price: Vec::new(),
            caller_ids: false,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn iteration_is_base_major() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut def = plain("s", &["https://a.test", "https://b.test/"]);
        def.listing = vec![RouteTemplate::json("/one"), RouteTemplate::json("/two")];
        fetcher.respond_json("https://b.test/one", r#"[{"name":"Hit"}]"#);

        let probe = source(def, &fetcher)
            .list_candidates(&ListingQuery::popular(5))
            .await;
        let hit = probe.hit.unwrap();
        assert_eq!(hit.route, "https://b.test/one");
        assert_eq!(hit.value[0].origin(), Some("s"));
        assert_eq!(
            fetcher.requested_urls(),
            vec!["https://a.test/one", "https://a.test/two", "https://b.test/one"]
        );
        assert_eq!(probe.attempts.len(), 3);
    }

    #[tokio::test]
    async fn switches_to_bearer_only_after_auth_rejection() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut def = plain("db", &["https://db.test"]);
        let mut auth = AuthConfig::from_env("UNUSED");
        auth.token = Some("secret".into());
        def.auth = Some(auth);
        def.price = vec![RouteTemplate::json("/p/{id}"), RouteTemplate::json("/q/{id}")];
        fetcher.respond_status("https://db.test/p/7", 404);
        fetcher.respond_with_header("https://db.test/q/7", "X-AUTH-TOKEN", 403, "");
        fetcher.respond_with_header("https://db.test/q/7", "Authorization", 200, r#"{"lowestBin":5300}"#);

        let candidate = Candidate::new("Seven").unwrap().with_id(CandidateId::new("7"));
        let probe = source(def, &fetcher).resolve_price(&candidate, Platform::Ps).await;

        assert_eq!(probe.hit.as_ref().map(|h| h.value), Some(5300));
        let outcomes: Vec<_> = probe.attempts.iter().map(|a| a.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                AttemptOutcome::Http(404),
                AttemptOutcome::AuthRejected(403),
                AttemptOutcome::Resolved,
            ]
        );
        let sent = fetcher.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].header_value("authorization"), Some("Bearer secret"));
    }

    #[tokio::test]
    async fn missing_token_skips_the_source() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut def = plain("db", &["https://db.test"]);
        def.auth = Some(AuthConfig::from_env("UNUSED"));
        def.listing = vec![RouteTemplate::json("/players")];

        let probe = source(def, &fetcher)
            .list_candidates(&ListingQuery::popular(5))
            .await;
        assert!(probe.hit.is_none());
        assert!(matches!(probe.attempts[0].outcome, AttemptOutcome::Skipped(_)));
        assert!(fetcher.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn foreign_ids_are_replaced_by_search() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut def = plain("gg", &["https://gg.test"]);
        def.search = vec![RouteTemplate::markup("/players/?name={query}")];
        def.price = vec![RouteTemplate::markup("/players/{id}/")];
        fetcher.respond_text(
            "https://gg.test/players/?name=Erling+Haaland",
            r#"<a href="/players/1-other/">Someone Else</a>
               <a href="/players/239085-erling-haaland/">Erling Haaland</a>"#,
        );
        fetcher.respond_text("https://gg.test/players/239085/", r#"{"lowestBin": 61000}"#);

        let candidate = Candidate::new("Erling Haaland")
            .unwrap()
            .with_id(CandidateId::new("999"))
            .with_origin("other");
        let probe = source(def, &fetcher).resolve_price(&candidate, Platform::Ps).await;

        assert_eq!(probe.hit.unwrap().value, 61_000);
        assert!(!fetcher.requested_urls().iter().any(|u| u.contains("999")));
    }

    #[tokio::test]
    async fn empty_payload_moves_to_next_route_without_switching_auth() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut def = plain("s", &["https://a.test"]);
        def.listing = vec![RouteTemplate::json("/empty"), RouteTemplate::json("/garbled")];
        fetcher.respond_json("https://a.test/empty", r#"{"items": []}"#);
        fetcher.respond_json("https://a.test/garbled", "<html>");

        let probe = source(def, &fetcher)
            .list_candidates(&ListingQuery::popular(5))
            .await;
        assert!(probe.hit.is_none());
        assert_eq!(probe.attempts[0].outcome, AttemptOutcome::Empty);
        assert!(matches!(probe.attempts[1].outcome, AttemptOutcome::Parse(_)));
    }
}
