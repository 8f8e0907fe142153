//! Declarative source descriptions.
//!
//! A [`SourceDefinition`] is a route table: base endpoints crossed with path
//! templates, plus the credential schemes to present. One generic executor
//! ([`super::TableSource`]) runs every definition.

use serde::Deserialize;
use url::form_urlencoded;

use crate::domain::Platform;

/// Placeholders a path template may use.
pub const PLACEHOLDERS: &[&str] = &["page", "limit", "query", "name", "id", "platform"];

/// Header used for header-token auth when none is configured.
pub const DEFAULT_AUTH_HEADER: &str = "X-AUTH-TOKEN";

/// How a route's body is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    #[default]
    Json,
    Markup,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoute {
    Path(String),
    Full {
        path: String,
        #[serde(default)]
        format: PayloadFormat,
    },
}

/// A path template appended to each base.
///
/// In TOML a bare string is a JSON route; a table sets the format:
/// `{ path = "/players/{id}/", format = "markup" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRoute")]
pub struct RouteTemplate {
    pub path: String,
    pub format: PayloadFormat,
}

impl From<RawRoute> for RouteTemplate {
    fn from(raw: RawRoute) -> Self {
        match raw {
            RawRoute::Path(path) => Self::json(path),
            RawRoute::Full { path, format } => Self { path, format },
        }
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteVars<'a> {
    pub page: u32,
    pub limit: usize,
    pub query: Option<&'a str>,
    pub id: Option<&'a str>,
    pub platform: Option<Platform>,
}

impl RouteTemplate {
    pub fn json(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: PayloadFormat::Json,
        }
    }

    pub fn markup(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: PayloadFormat::Markup,
        }
    }

    /// Placeholder names used by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.path
            .split('{')
            .skip(1)
            .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
    }

    #[must_use]
    pub fn uses(&self, placeholder: &str) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }

    /// Substitute `vars` into the template.
    ///
    /// Returns `None` when the template needs a value that `vars` lacks.
    #[must_use]
    pub fn render(&self, vars: &RouteVars<'_>) -> Option<String> {
        let mut out = self.path.clone();
        for name in self.placeholders().collect::<Vec<_>>() {
            let value = match name {
                "page" => vars.page.to_string(),
                "limit" => vars.limit.to_string(),
                "query" | "name" => encode(vars.query?),
                "id" => encode(vars.id?),
                "platform" => vars.platform?.code().to_string(),
                _ => return None,
            };
            out = out.replace(&format!("{{{name}}}"), &value);
        }
        Some(out)
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Credentials for a token-protected source.
///
/// The token itself is never read from the config file: `token_env` names
/// the environment variable holding it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_header")]
    pub header: String,
    pub token_env: String,
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

impl AuthConfig {
    pub fn from_env(token_env: impl Into<String>) -> Self {
        Self {
            header: default_auth_header(),
            token_env: token_env.into(),
            token: None,
        }
    }

    /// Populate `token` from the environment. Blank values count as unset.
    pub fn resolve_token(&mut self) {
        self.token = std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }
}

/// One way of presenting credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    Anonymous,
    HeaderToken { header: String },
    Bearer,
}

impl AuthScheme {
    /// Short label used in route provenance.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::HeaderToken { .. } => "header",
            Self::Bearer => "bearer",
        }
    }
}

/// A data source as a route table.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    pub id: String,
    pub bases: Vec<String>,
    /// `Accept` header sent with every request.
    #[serde(default)]
    pub accept: Option<String>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Routes listing popular candidates.
    #[serde(default)]
    pub listing: Vec<RouteTemplate>,
    /// Routes searching candidates by name.
    #[serde(default)]
    pub search: Vec<RouteTemplate>,
    /// Routes returning a price for one candidate.
    #[serde(default)]
    pub price: Vec<RouteTemplate>,
    /// Caller-supplied player ids are in this source's id namespace.
    #[serde(default)]
    pub caller_ids: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl SourceDefinition {
    /// Credential schemes to try per route, in order.
    ///
    /// Empty when the source needs a token that is not available.
    #[must_use]
    pub fn auth_schemes(&self) -> Vec<AuthScheme> {
        match &self.auth {
            None => vec![AuthScheme::Anonymous],
            Some(AuthConfig { token: None, .. }) => Vec::new(),
            Some(auth) => vec![
                AuthScheme::HeaderToken {
                    header: auth.header.clone(),
                },
                AuthScheme::Bearer,
            ],
        }
    }

    /// Every template across the three route lists.
    pub fn templates(&self) -> impl Iterator<Item = &RouteTemplate> {
        self.listing.iter().chain(&self.search).chain(&self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_and_encodes_placeholders() {
        let tpl = RouteTemplate::json("/players?search={query}&limit={limit}&p={platform}");
        let vars = RouteVars {
            limit: 10,
            query: Some("Vini Jr & co"),
            platform: Some(Platform::Xbox),
            ..RouteVars::default()
        };
        assert_eq!(
            tpl.render(&vars).as_deref(),
            Some("/players?search=Vini+Jr+%26+co&limit=10&p=xbox")
        );
    }

    #[test]
    fn missing_id_leaves_template_unrenderable() {
        let tpl = RouteTemplate::markup("/players/{id}/");
        assert!(tpl.uses("id"));
        assert_eq!(tpl.render(&RouteVars::default()), None);
        let vars = RouteVars {
            id: Some("231747"),
            ..RouteVars::default()
        };
        assert_eq!(tpl.render(&vars).as_deref(), Some("/players/231747/"));
    }

    #[test]
    fn unknown_placeholder_never_renders() {
        let tpl = RouteTemplate::json("/x/{season}");
        assert_eq!(tpl.placeholders().collect::<Vec<_>>(), vec!["season"]);
        assert_eq!(tpl.render(&RouteVars::default()), None);
    }

    #[test]
    fn routes_deserialize_from_strings_or_tables() {
        #[derive(Deserialize)]
        struct Routes {
            routes: Vec<RouteTemplate>,
        }
        let parsed: Routes = toml::from_str(
            r#"routes = ["/a", { path = "/b", format = "markup" }, { path = "/c" }]"#,
        )
        .unwrap();
        assert_eq!(
            parsed.routes,
            vec![
                RouteTemplate::json("/a"),
                RouteTemplate::markup("/b"),
                RouteTemplate::json("/c"),
            ]
        );
    }

    #[test]
    fn auth_schemes_follow_token_availability() {
        let mut def = SourceDefinition {
            id: "db".into(),
            bases: vec!["https://db.test".into()],
            accept: None,
            auth: None,
            listing: Vec::new(),
            search: Vec::new(),
            price: Vec::new(),
            caller_ids: false,
            enabled: true,
        };
        assert_eq!(def.auth_schemes(), vec![AuthScheme::Anonymous]);

        def.auth = Some(AuthConfig::from_env("UNUSED"));
        assert!(def.auth_schemes().is_empty());

        if let Some(auth) = def.auth.as_mut() {
            auth.token = Some("k".into());
        }
        assert_eq!(
            def.auth_schemes(),
            vec![
                AuthScheme::HeaderToken {
                    header: "X-AUTH-TOKEN".into()
                },
                AuthScheme::Bearer
            ]
        );
    }
}
