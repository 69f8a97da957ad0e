pub mod config;
pub mod error;
pub mod extract;
pub mod query;
pub mod resolver;
pub mod source;

pub use config::{
    BatchConfig, ConfigError, FounderscanConfig, PipelineConfig, RecognizerConfig, RecognizerKind,
};
pub use error::{Error, Result};
pub use extract::{
    recognizer_from_config, CandidateName, EntityLabel, EntityRecognizer, ExtractionPipeline,
    NameValidator, NormalizedText, PipelineOutput, RecognitionError, RecognizedSpan,
    RelevanceFilter, RemoteRecognizer, RuleBasedRecognizer, TextNormalizer, ValidatedName,
};
pub use query::{HttpSourceQuery, QueryConfig, QueryError, SourceEndpoint, SourceQuery};
pub use resolver::{
    AttemptOutcome, BatchResolution, ExtractionResult, FounderResolver, ResolutionStats,
    SourceAttempt,
};
pub use source::{ResultSource, SourceKind};

/// Build a resolver from configuration: pipeline, recognizer and batch delay.
pub fn resolver_from_config(config: &FounderscanConfig) -> Result<FounderResolver> {
    let recognizer = recognizer_from_config(&config.recognizer)?;
    let pipeline = ExtractionPipeline::new(&config.pipeline, recognizer);
    Ok(FounderResolver::new(pipeline)
        .with_delay(std::time::Duration::from_millis(config.batch.delay_ms)))
}
