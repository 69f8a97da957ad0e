mod client;
mod config;
mod html;

pub use client::HttpSourceQuery;
pub use config::{QueryConfig, SourceEndpoint};
pub use html::HtmlReducer;

use thiserror::Error;

use crate::source::SourceKind;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Required element not found: {0}")]
    ElementNotFound(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    #[error("Page had no text content: {0}")]
    EmptyPage(String),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Produces raw page text for a company from one of the information sources.
///
/// Implementations own whatever session the lookup needs (HTTP client,
/// browser, API credentials). A failure is always recoverable from the
/// caller's point of view: the resolver logs it and moves on.
#[async_trait::async_trait]
pub trait SourceQuery: Send + Sync {
    async fn fetch(&self, company: &str, kind: SourceKind) -> QueryResult<String>;
}
