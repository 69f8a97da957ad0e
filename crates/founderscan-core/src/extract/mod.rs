mod normalizer;
mod persons;
mod pipeline;
mod recognizer;
mod relevance;
mod validator;

pub use normalizer::{NormalizedText, TextNormalizer};
pub use persons::{CandidateName, PersonExtractor};
pub use pipeline::{ExtractionPipeline, PipelineOutput};
pub use recognizer::{
    EntityLabel, EntityRecognizer, RecognitionError, RecognitionPattern, RecognitionResult,
    RecognizedSpan, RemoteRecognizer, RuleBasedRecognizer,
};
pub use relevance::{sentences, RelevanceFilter};
pub use validator::{NameValidator, ValidatedName};

use std::time::Duration;

use crate::config::{RecognizerConfig, RecognizerKind};

/// Build the recognizer described by `config`.
pub fn recognizer_from_config(
    config: &RecognizerConfig,
) -> RecognitionResult<Box<dyn EntityRecognizer>> {
    match config.kind {
        RecognizerKind::RuleBased => Ok(Box::new(RuleBasedRecognizer::with_default_patterns())),
        RecognizerKind::Remote => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                RecognitionError::Unavailable("remote recognizer has no endpoint".into())
            })?;
            let timeout = Duration::from_secs(u64::from(config.timeout_seconds));
            Ok(Box::new(RemoteRecognizer::new(endpoint, timeout)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizer_from_config() {
        let rule_based = recognizer_from_config(&RecognizerConfig::default()).unwrap();
        assert_eq!(rule_based.name(), "rule_based");

        let remote = recognizer_from_config(&RecognizerConfig {
            kind: RecognizerKind::Remote,
            endpoint: Some("http://localhost:9000/ner".into()),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(remote.name(), "remote");
    }

    #[test]
    fn test_remote_without_endpoint_fails() {
        let result = recognizer_from_config(&RecognizerConfig {
            kind: RecognizerKind::Remote,
            endpoint: None,
            timeout_seconds: 5,
        });
        assert!(matches!(result, Err(RecognitionError::Unavailable(_))));
    }
}
