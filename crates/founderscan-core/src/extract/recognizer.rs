use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Recognition failed: {0}")]
    Failed(String),
    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed recognizer response: {0}")]
    Malformed(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type RecognitionResult<T> = Result<T, RecognitionError>;

/// Entity class attached to a recognized span.
///
/// Parsed from the label vocabulary common to NER models (`PERSON`, `ORG`,
/// `GPE`, ...). Anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Other(String),
}

impl EntityLabel {
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "ORG" | "ORGANIZATION" => Self::Organization,
            "GPE" | "LOC" | "LOCATION" => Self::Location,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORG",
            Self::Location => "LOC",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedSpan {
    pub text: String,
    pub label: EntityLabel,
}

impl RecognizedSpan {
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    #[must_use]
    pub fn person(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Person)
    }
}

/// A named-entity-recognition capability.
///
/// Given a text blob, returns labelled spans in the order the model emits
/// them.
#[async_trait::async_trait]
pub trait EntityRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn recognize(&self, text: &str) -> RecognitionResult<Vec<RecognizedSpan>>;
}

/// Leading capitalised words that open a sentence or title rather than a name
const NON_NAME_WORDS: &[&str] = &[
    "A", "An", "And", "As", "At", "By", "Ceo", "Chairman", "Chief", "Co", "Cofounder",
    "Executive", "For", "Founded", "Founder", "Founders", "In", "It", "Its", "Mr", "Mrs", "Ms",
    "Dr", "Of", "On", "President", "The", "Their", "This", "When", "With",
];

pub struct RecognitionPattern {
    pub label: EntityLabel,
    pub regex: regex::Regex,
}

impl RecognitionPattern {
    pub fn new(label: EntityLabel, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            regex: regex::Regex::new(pattern)?,
        })
    }
}

/// Pattern-based recognizer that needs no model.
///
/// The default pattern labels runs of two to four capitalised words as
/// PERSON, so it only works on text whose casing was preserved.
pub struct RuleBasedRecognizer {
    patterns: Vec<RecognitionPattern>,
}

impl RuleBasedRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: RecognitionPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_default_patterns() -> Self {
        let mut recognizer = Self::new();

        let person_pattern = RecognitionPattern::new(
            EntityLabel::Person,
            r"\b\p{Lu}[\p{Ll}'’]+(?: \p{Lu}[\p{Ll}'’]+){1,3}\b",
        );

        if let Ok(p) = person_pattern {
            recognizer.patterns.push(p);
        }

        recognizer
    }

    fn strip_non_name_words(span: &str) -> &str {
        let mut rest = span;
        while let Some((first, tail)) = rest.split_once(' ') {
            if !NON_NAME_WORDS.contains(&first) {
                break;
            }
            rest = tail;
        }
        rest
    }
}

impl Default for RuleBasedRecognizer {
    fn default() -> Self {
        Self::with_default_patterns()
    }
}

#[async_trait::async_trait]
impl EntityRecognizer for RuleBasedRecognizer {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn recognize(&self, text: &str) -> RecognitionResult<Vec<RecognizedSpan>> {
        let mut matches: Vec<(usize, RecognizedSpan)> = Vec::new();

        for pattern in &self.patterns {
            for found in pattern.regex.find_iter(text) {
                let span = if pattern.label == EntityLabel::Person {
                    Self::strip_non_name_words(found.as_str())
                } else {
                    found.as_str()
                };

                if span.contains(' ') || pattern.label != EntityLabel::Person {
                    matches.push((
                        found.start(),
                        RecognizedSpan::new(span, pattern.label.clone()),
                    ));
                }
            }
        }

        // Emit in text order, as a model would
        matches.sort_by_key(|(start, _)| *start);
        Ok(matches.into_iter().map(|(_, span)| span).collect())
    }
}

#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    ents: Vec<RecognizedSpan>,
}

/// Recognizer backed by an HTTP NER service.
///
/// POSTs `{"text": ...}` and expects `{"ents": [{"text": ..., "label": ...}]}`,
/// the shape spaCy-style servers return.
pub struct RemoteRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> RecognitionResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl EntityRecognizer for RemoteRecognizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn recognize(&self, text: &str) -> RecognitionResult<Vec<RecognizedSpan>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RemoteRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Unavailable(format!(
                "{} returned {status}",
                self.endpoint
            )));
        }

        let body = response.text().await?;
        let parsed: RemoteResponse =
            serde_json::from_str(&body).map_err(|e| RecognitionError::Malformed(e.to_string()))?;

        Ok(parsed.ents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_label_parsing() {
        assert_eq!(EntityLabel::parse("PERSON"), EntityLabel::Person);
        assert_eq!(EntityLabel::parse("per"), EntityLabel::Person);
        assert_eq!(EntityLabel::parse("ORG"), EntityLabel::Organization);
        assert_eq!(EntityLabel::parse("GPE"), EntityLabel::Location);
        assert_eq!(EntityLabel::parse("DATE"), EntityLabel::Other("DATE".into()));
        assert_eq!(EntityLabel::Other("DATE".into()).as_str(), "DATE");
    }

    #[tokio::test]
    async fn test_rule_based_finds_capitalised_names() {
        let recognizer = RuleBasedRecognizer::default();

        let spans = recognizer
            .recognize("Jane Doe is the founder of the company, and John Roe became a cofounder")
            .await
            .unwrap();

        let names: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "John Roe"]);
        assert!(spans.iter().all(|s| s.label == EntityLabel::Person));
    }

    #[tokio::test]
    async fn test_rule_based_strips_leading_titles() {
        let recognizer = RuleBasedRecognizer::default();

        let spans = recognizer
            .recognize("The company was started by Founder Jane Doe in 1999")
            .await
            .unwrap();

        assert_eq!(spans, vec![RecognizedSpan::person("Jane Doe")]);
    }

    #[tokio::test]
    async fn test_rule_based_ignores_lowercase_text() {
        let recognizer = RuleBasedRecognizer::default();

        let spans = recognizer.recognize("jane doe is the founder").await.unwrap();

        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn test_rule_based_custom_pattern() {
        let pattern = RecognitionPattern::new(EntityLabel::Organization, r"\b\w+ Inc\b").unwrap();
        let recognizer = RuleBasedRecognizer::new().with_pattern(pattern);

        let spans = recognizer.recognize("Acme Inc was founded").await.unwrap();

        assert_eq!(
            spans,
            vec![RecognizedSpan::new("Acme Inc", EntityLabel::Organization)]
        );
    }

    #[tokio::test]
    async fn test_remote_recognizer_parses_entities() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ner"))
            .and(body_json(serde_json::json!({ "text": "Jane Doe founded Acme" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ents": [
                    { "text": "Jane Doe", "label": "PERSON" },
                    { "text": "Acme", "label": "ORG" }
                ]
            })))
            .mount(&server)
            .await;

        let recognizer =
            RemoteRecognizer::new(format!("{}/ner", server.uri()), Duration::from_secs(2)).unwrap();
        let spans = recognizer.recognize("Jane Doe founded Acme").await.unwrap();

        assert_eq!(
            spans,
            vec![
                RecognizedSpan::person("Jane Doe"),
                RecognizedSpan::new("Acme", EntityLabel::Organization),
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_recognizer_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let recognizer = RemoteRecognizer::new(server.uri(), Duration::from_secs(2)).unwrap();
        let result = recognizer.recognize("Jane Doe").await;

        assert!(matches!(result, Err(RecognitionError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_remote_recognizer_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let recognizer = RemoteRecognizer::new(server.uri(), Duration::from_secs(2)).unwrap();
        let result = recognizer.recognize("Jane Doe").await;

        assert!(matches!(result, Err(RecognitionError::Unavailable(_))));
    }
}
