use reqwest::Client;
use std::time::Duration;

use super::config::QueryConfig;
use super::html::HtmlReducer;
use super::{QueryError, QueryResult, SourceQuery};
use crate::source::SourceKind;

/// Source lookup over plain HTTP.
///
/// The underlying `reqwest::Client` is the lookup session: it is built once
/// in [`HttpSourceQuery::new`], reused for every company, and released when
/// the value is dropped.
pub struct HttpSourceQuery {
    config: QueryConfig,
    client: Client,
    reducer: HtmlReducer,
}

impl HttpSourceQuery {
    pub fn new(config: QueryConfig) -> QueryResult<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(random_user_agent);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            config,
            client,
            reducer: HtmlReducer::new()?,
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    async fn fetch_page(&self, url: url::Url) -> QueryResult<String> {
        let url_str = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, &url_str))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                url: url_str,
            });
        }

        response.text().await.map_err(|e| classify(e, &url_str))
    }
}

#[async_trait::async_trait]
impl SourceQuery for HttpSourceQuery {
    async fn fetch(&self, company: &str, kind: SourceKind) -> QueryResult<String> {
        let endpoint = self.config.endpoint(kind);
        let url = endpoint.render_url(company)?;

        tracing::debug!(%company, source = %kind, %url, "Fetching source page");

        let html = self.fetch_page(url.clone()).await?;
        let text = self
            .reducer
            .reduce(&html, endpoint.required_selector.as_deref())?;

        if text.trim().is_empty() {
            return Err(QueryError::EmptyPage(url.to_string()));
        }

        Ok(text)
    }
}

fn classify(error: reqwest::Error, url: &str) -> QueryError {
    if error.is_timeout() {
        QueryError::Timeout(url.to_string())
    } else {
        QueryError::Http(error)
    }
}

fn random_user_agent() -> String {
    use rand::Rng;

    let agents = [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0",
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:128.0) Gecko/20100101 Firefox/128.0",
        "Mozilla/5.0 (Windows NT 10.0; rv:115.0) Gecko/20100101 Firefox/115.0",
    ];

    let mut rng = rand::rng();
    agents[rng.random_range(0..agents.len())].to_string()
}
