use thiserror::Error;

use crate::config::ConfigError;
use crate::extract::RecognitionError;
use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid source kind: {0}")]
    InvalidSourceKind(String),

    #[error("Invalid result source: {0}")]
    InvalidResultSource(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
