use serde::{Deserialize, Serialize};

use super::recognizer::{EntityLabel, EntityRecognizer, RecognitionResult};

/// A span the recognizer labelled PERSON, not yet vetted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateName(String);

impl CandidateName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CandidateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls person names out of text through an [`EntityRecognizer`].
pub struct PersonExtractor {
    recognizer: Box<dyn EntityRecognizer>,
}

impl PersonExtractor {
    #[must_use]
    pub fn new(recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    #[must_use]
    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// PERSON spans of `text`, trimmed, in recognizer order.
    ///
    /// Blank input short-circuits without calling the recognizer.
    pub async fn extract_persons(&self, text: &str) -> RecognitionResult<Vec<CandidateName>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let spans = self.recognizer.recognize(text).await?;

        Ok(spans
            .into_iter()
            .filter(|span| span.label == EntityLabel::Person)
            .map(|span| span.text.trim().to_string())
            .filter(|name| !name.is_empty())
            .map(CandidateName)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{RecognitionError, RecognizedSpan};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubRecognizer {
        spans: Vec<RecognizedSpan>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl EntityRecognizer for StubRecognizer {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn recognize(&self, _text: &str) -> RecognitionResult<Vec<RecognizedSpan>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.spans.clone())
        }
    }

    struct FailingRecognizer;

    #[async_trait::async_trait]
    impl EntityRecognizer for FailingRecognizer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn recognize(&self, _text: &str) -> RecognitionResult<Vec<RecognizedSpan>> {
            Err(RecognitionError::Failed("model crashed".into()))
        }
    }

    fn stub(spans: Vec<RecognizedSpan>) -> (PersonExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = PersonExtractor::new(Box::new(StubRecognizer {
            spans,
            calls: Arc::clone(&calls),
        }));
        (extractor, calls)
    }

    #[tokio::test]
    async fn test_keeps_person_spans_in_order() {
        let (extractor, _) = stub(vec![
            RecognizedSpan::person(" Jane Doe "),
            RecognizedSpan::new("Acme", EntityLabel::Organization),
            RecognizedSpan::person("John Roe"),
            RecognizedSpan::new("Paris", EntityLabel::Location),
        ]);

        let names = extractor.extract_persons("some text").await.unwrap();

        assert_eq!(
            names,
            vec![CandidateName::new("Jane Doe"), CandidateName::new("John Roe")]
        );
    }

    #[tokio::test]
    async fn test_empty_input_skips_recognizer() {
        let (extractor, calls) = stub(vec![RecognizedSpan::person("Ghost Name")]);

        let names = extractor.extract_persons("").await.unwrap();

        assert!(names.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_spans_dropped() {
        let (extractor, calls) = stub(vec![RecognizedSpan::person("   ")]);

        let names = extractor.extract_persons("text").await.unwrap();

        assert!(names.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognizer_failure_propagates() {
        let extractor = PersonExtractor::new(Box::new(FailingRecognizer));

        let result = extractor.extract_persons("Jane Doe").await;

        assert!(matches!(result, Err(RecognitionError::Failed(_))));
        assert_eq!(extractor.recognizer_name(), "failing");
    }
}
