use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::query::QueryConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Knobs for the extraction pipeline.
///
/// Variants of the pipeline (narrower keyword sets, lower-cased
/// normalization, extra blocklist terms) are expressed here rather than as
/// separate code paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sentences mentioning any of these (case-insensitive) are kept
    pub keywords: Vec<String>,
    /// Lower-case text during normalization
    pub lowercase: bool,
    /// Tokens that disqualify a candidate name (case-insensitive)
    pub blocklist: Vec<String>,
    /// Minimum number of whitespace-separated tokens in a name
    pub min_tokens: usize,
    /// Names kept per successful source attempt
    pub max_founders: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keywords: ["founder", "co-founder", "founder of", "founded by"]
                .into_iter()
                .map(String::from)
                .collect(),
            lowercase: false,
            blocklist: ["search", "website", "form", "adv", "llc"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_tokens: 2,
            max_founders: 1,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("keywords must not be empty".into()));
        }
        if self.min_tokens == 0 {
            return Err(ConfigError::Invalid("min_tokens must be at least 1".into()));
        }
        if self.max_founders == 0 {
            return Err(ConfigError::Invalid("max_founders must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerKind {
    /// Capitalised-word heuristic, no external service
    #[default]
    RuleBased,
    /// HTTP named-entity-recognition service
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub kind: RecognizerKind,
    /// Endpoint of the remote recognizer
    pub endpoint: Option<String>,
    pub timeout_seconds: u32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            kind: RecognizerKind::RuleBased,
            endpoint: None,
            timeout_seconds: 30,
        }
    }
}

impl RecognizerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.kind == RecognizerKind::Remote && self.endpoint.is_none() {
            return Err(ConfigError::Invalid(
                "remote recognizer requires an endpoint".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause between companies, in milliseconds
    pub delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

/// Top-level configuration, loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FounderscanConfig {
    pub pipeline: PipelineConfig,
    pub recognizer: RecognizerConfig,
    pub query: QueryConfig,
    pub batch: BatchConfig,
}

impl FounderscanConfig {
    /// `$XDG_CONFIG_HOME/founderscan/config.toml` or the platform equivalent
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("founderscan").join("config.toml"))
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `path` if given, otherwise the default location if it exists,
    /// otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => {
                tracing::debug!(path = %default.display(), "Loading default config");
                Self::load(&default)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Overlay `FOUNDERSCAN_*` environment variables.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("FOUNDERSCAN_LOWERCASE") {
            self.pipeline.lowercase = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = lookup("FOUNDERSCAN_RECOGNIZER_ENDPOINT") {
            self.recognizer.kind = RecognizerKind::Remote;
            self.recognizer.endpoint = Some(v);
        }
        if let Some(v) = lookup("FOUNDERSCAN_PRIMARY_URL") {
            self.query.primary.url_template = v;
        }
        if let Some(v) = lookup("FOUNDERSCAN_SECONDARY_URL") {
            self.query.secondary.url_template = v;
        }
        if let Some(v) = lookup("FOUNDERSCAN_USER_AGENT") {
            self.query.user_agent = Some(v);
        }
        if let Some(delay) = lookup("FOUNDERSCAN_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.batch.delay_ms = delay;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.pipeline.validate()?;
        self.recognizer.validate()?;
        // The rule-based recognizer keys on capital letters
        if self.pipeline.lowercase && self.recognizer.kind == RecognizerKind::RuleBased {
            return Err(ConfigError::Invalid(
                "lowercase normalization requires the remote recognizer".into(),
            ));
        }
        self.query.validate()
    }
}
