use super::normalizer::{NormalizedText, TextNormalizer};
use super::persons::{CandidateName, PersonExtractor};
use super::recognizer::{EntityRecognizer, RecognitionResult, RuleBasedRecognizer};
use super::relevance::RelevanceFilter;
use super::validator::{NameValidator, ValidatedName};
use crate::config::PipelineConfig;

/// Everything one pipeline run produced, stage by stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub normalized: NormalizedText,
    pub relevant_text: String,
    pub candidates: Vec<CandidateName>,
    pub names: Vec<ValidatedName>,
}

impl PipelineOutput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Raw page text → normalizer → relevance filter → person extractor →
/// name validator.
pub struct ExtractionPipeline {
    normalizer: TextNormalizer,
    filter: RelevanceFilter,
    extractor: PersonExtractor,
    validator: NameValidator,
    max_founders: usize,
}

impl ExtractionPipeline {
    #[must_use]
    pub fn new(config: &PipelineConfig, recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            normalizer: TextNormalizer::new(config.lowercase),
            filter: RelevanceFilter::new(&config.keywords),
            extractor: PersonExtractor::new(recognizer),
            validator: NameValidator::new(config.min_tokens, &config.blocklist),
            max_founders: config.max_founders.max(1),
        }
    }

    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Box<dyn EntityRecognizer>) -> Self {
        self.extractor = PersonExtractor::new(recognizer);
        self
    }

    /// How many validated names a successful source attempt keeps.
    #[must_use]
    pub fn max_founders(&self) -> usize {
        self.max_founders
    }

    #[must_use]
    pub fn recognizer_name(&self) -> &'static str {
        self.extractor.recognizer_name()
    }

    pub async fn run(&self, raw: &str) -> RecognitionResult<PipelineOutput> {
        let normalized = self.normalizer.normalize(raw);
        let relevant_text = self.filter.filter(&normalized);

        tracing::debug!(
            raw_chars = raw.len(),
            normalized_chars = normalized.as_str().len(),
            relevant_chars = relevant_text.len(),
            "Filtered page text"
        );

        // One sentence at a time so spans never straddle a sentence break
        let mut candidates = Vec::new();
        for sentence in self.filter.relevant_sentences(&normalized) {
            candidates.extend(self.extractor.extract_persons(sentence).await?);
        }
        let names = self.validator.validate(candidates.clone());

        tracing::debug!(
            candidates = candidates.len(),
            accepted = names.len(),
            recognizer = self.recognizer_name(),
            "Validated candidate names"
        );

        Ok(PipelineOutput {
            normalized,
            relevant_text,
            candidates,
            names,
        })
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(
            &PipelineConfig::default(),
            Box::new(RuleBasedRecognizer::default()),
        )
    }
}
