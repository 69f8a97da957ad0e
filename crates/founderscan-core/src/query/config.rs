use serde::{Deserialize, Serialize};
use url::Url;

use super::{QueryError, QueryResult};
use crate::config::{ConfigError, ConfigResult};
use crate::source::SourceKind;

const QUERY_PLACEHOLDER: &str = "{query}";
const COMPANY_PLACEHOLDER: &str = "{company}";
const ARTICLE_SELECTOR: &str = "body.ns-0 #firstHeading";

/// How to look a company up on one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoint {
    /// URL with a `{query}` placeholder, replaced by the form-encoded query
    pub url_template: String,
    /// Search phrase with a `{company}` placeholder
    pub query_template: String,
    /// CSS selector that must be present for the page to count as loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_selector: Option<String>,
}

impl SourceEndpoint {
    #[must_use]
    pub fn new(url_template: impl Into<String>, query_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            query_template: query_template.into(),
            required_selector: None,
        }
    }

    #[must_use]
    pub fn with_required_selector(mut self, selector: impl Into<String>) -> Self {
        self.required_selector = Some(selector.into());
        self
    }

    /// Default primary source: a general web search for the founder's name.
    #[must_use]
    pub fn web_search() -> Self {
        Self::new(
            "https://html.duckduckgo.com/html/?q={query}",
            "{company} founder name",
        )
    }

    /// Default secondary source: an encyclopedia lookup that jumps straight
    /// to the matching article when one exists.
    ///
    /// The search results page also has a `#firstHeading`, so the selector
    /// pins the article namespace (`ns-0`) on `<body>`.
    #[must_use]
    pub fn encyclopedia() -> Self {
        Self::new(
            "https://en.wikipedia.org/w/index.php?search={query}&title=Special:Search&go=Go",
            "{company}",
        )
        .with_required_selector(ARTICLE_SELECTOR)
    }

    #[must_use]
    pub fn render_query(&self, company: &str) -> String {
        self.query_template
            .replace(COMPANY_PLACEHOLDER, company.trim())
    }

    pub fn render_url(&self, company: &str) -> QueryResult<Url> {
        let query = self.render_query(company);
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let rendered = self.url_template.replace(QUERY_PLACEHOLDER, &encoded);

        let url = Url::parse(&rendered)?;
        if url.host_str().is_none() {
            return Err(QueryError::InvalidUrl(rendered));
        }
        Ok(url)
    }

    fn validate(&self, kind: SourceKind) -> ConfigResult<()> {
        if !self.url_template.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "{kind} url_template must contain {QUERY_PLACEHOLDER}"
            )));
        }
        if !self.query_template.contains(COMPANY_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "{kind} query_template must contain {COMPANY_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

/// Settings for the HTTP-backed source lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub primary: SourceEndpoint,
    pub secondary: SourceEndpoint,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Whole-request timeout in seconds
    pub request_timeout_seconds: u32,
    /// User agent to use (randomized by default)
    pub user_agent: Option<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            primary: SourceEndpoint::web_search(),
            secondary: SourceEndpoint::encyclopedia(),
            connect_timeout_seconds: 10,
            request_timeout_seconds: 20,
            user_agent: None,
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub fn endpoint(&self, kind: SourceKind) -> &SourceEndpoint {
        match kind {
            SourceKind::Primary => &self.primary,
            SourceKind::Secondary => &self.secondary,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for kind in SourceKind::ALL {
            self.endpoint(kind).validate(kind)?;
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_query_substitutes_company() {
        let endpoint = SourceEndpoint::web_search();
        assert_eq!(endpoint.render_query("  Acme Corp "), "Acme Corp founder name");
    }

    #[test]
    fn test_render_url_encodes_query() {
        let endpoint = SourceEndpoint::new("https://search.example/?q={query}", "{company} & co");
        let url = endpoint.render_url("Ben & Jerry's").unwrap();

        let (_, value) = url.query_pairs().next().unwrap();
        assert_eq!(value, "Ben & Jerry's & co");
        assert_eq!(url.host_str(), Some("search.example"));
    }

    #[test]
    fn test_render_url_rejects_garbage() {
        let endpoint = SourceEndpoint::new("not a url {query}", "{company}");
        assert!(matches!(
            endpoint.render_url("Acme"),
            Err(QueryError::UrlParse(_))
        ));
    }

    #[test]
    fn test_default_secondary_requires_article() {
        let config = QueryConfig::default();
        assert_eq!(
            config.endpoint(SourceKind::Secondary).required_selector.as_deref(),
            Some("body.ns-0 #firstHeading")
        );
        assert!(config.endpoint(SourceKind::Primary).required_selector.is_none());
    }

    #[test]
    fn test_validate_requires_placeholders() {
        let mut config = QueryConfig::default();
        assert!(config.validate().is_ok());

        config.primary.url_template = "https://search.example/".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = QueryConfig::default();
        config.secondary.query_template = "founder".into();
        assert!(config.validate().is_err());
    }
}
