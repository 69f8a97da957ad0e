use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::extract::{ExtractionPipeline, ValidatedName};
use crate::query::SourceQuery;
use crate::source::{ResultSource, SourceKind};

/// What happened when one source was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// At least one name passed validation
    Found,
    /// The page was read but no acceptable name was in it
    NoCandidates,
    /// The lookup or the recognizer failed; treated like `NoCandidates`
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAttempt {
    pub kind: SourceKind,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Final answer for one company.
///
/// `founders` is empty exactly when `source` is [`ResultSource::NotFound`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    company_name: String,
    founders: Vec<ValidatedName>,
    source: ResultSource,
    attempts: Vec<SourceAttempt>,
    resolved_at: DateTime<Utc>,
}

impl ExtractionResult {
    fn found(
        company_name: String,
        founders: Vec<ValidatedName>,
        kind: SourceKind,
        attempts: Vec<SourceAttempt>,
    ) -> Self {
        Self {
            company_name,
            founders,
            source: kind.into(),
            attempts,
            resolved_at: Utc::now(),
        }
    }

    fn not_found(company_name: String, attempts: Vec<SourceAttempt>) -> Self {
        Self {
            company_name,
            founders: Vec::new(),
            source: ResultSource::NotFound,
            attempts,
            resolved_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    #[must_use]
    pub fn founders(&self) -> &[ValidatedName] {
        &self.founders
    }

    /// The best single guess, if any source produced one.
    #[must_use]
    pub fn founder(&self) -> Option<&ValidatedName> {
        self.founders.first()
    }

    #[must_use]
    pub fn source(&self) -> ResultSource {
        self.source
    }

    #[must_use]
    pub fn attempts(&self) -> &[SourceAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.source.is_found()
    }

    pub fn failed_attempts(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub companies: usize,
    pub primary_hits: usize,
    pub secondary_hits: usize,
    pub not_found: usize,
    pub failed_attempts: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

impl ResolutionStats {
    pub fn found(&self) -> usize {
        self.primary_hits + self.secondary_hits
    }

    fn record(&mut self, result: &ExtractionResult) {
        self.companies += 1;
        match result.source() {
            ResultSource::Primary => self.primary_hits += 1,
            ResultSource::Secondary => self.secondary_hits += 1,
            ResultSource::NotFound => self.not_found += 1,
        }
        self.failed_attempts += result.failed_attempts();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResolution {
    pub results: Vec<ExtractionResult>,
    pub stats: ResolutionStats,
}

/// Resolves companies to founder names, falling back from the primary to the
/// secondary source.
///
/// Resolution never fails: lookup and recognizer errors are logged and
/// counted as a miss for that source.
pub struct FounderResolver {
    pipeline: ExtractionPipeline,
    delay: Duration,
}

impl FounderResolver {
    #[must_use]
    pub fn new(pipeline: ExtractionPipeline) -> Self {
        Self {
            pipeline,
            delay: Duration::ZERO,
        }
    }

    /// Pause between companies in [`FounderResolver::resolve_all`].
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    pub async fn resolve_founder(
        &self,
        company_name: &str,
        query: &dyn SourceQuery,
    ) -> ExtractionResult {
        let company = company_name.trim();
        let mut attempts = Vec::with_capacity(SourceKind::ALL.len());
        let mut next = Some(SourceKind::Primary);

        while let Some(kind) = next {
            let (outcome, names) = self.attempt(company, kind, query).await;
            attempts.push(SourceAttempt { kind, outcome });

            if !names.is_empty() {
                tracing::info!(%company, source = %kind, founder = %names[0], "Founder found");
                return ExtractionResult::found(company.to_string(), names, kind, attempts);
            }

            next = kind.fallback();
            if let Some(fallback) = next {
                tracing::info!(%company, from = %kind, to = %fallback, "No founder found, falling back");
            }
        }

        tracing::info!(%company, "Founder not found");
        ExtractionResult::not_found(company.to_string(), attempts)
    }

    async fn attempt(
        &self,
        company: &str,
        kind: SourceKind,
        query: &dyn SourceQuery,
    ) -> (AttemptOutcome, Vec<ValidatedName>) {
        let raw = match query.fetch(company, kind).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%company, source = %kind, error = %e, "Source lookup failed");
                return (AttemptOutcome::Failed { reason: e.to_string() }, Vec::new());
            }
        };

        match self.pipeline.run(&raw).await {
            Ok(output) if output.is_empty() => (AttemptOutcome::NoCandidates, Vec::new()),
            Ok(output) => {
                let mut names: Vec<ValidatedName> = output
                    .names
                    .into_iter()
                    .filter(|name| !is_company_name(name.as_str(), company))
                    .collect();
                if names.is_empty() {
                    tracing::debug!(%company, source = %kind, "Only the company name was found");
                    return (AttemptOutcome::NoCandidates, names);
                }
                names.truncate(self.pipeline.max_founders());
                (AttemptOutcome::Found, names)
            }
            Err(e) => {
                tracing::warn!(%company, source = %kind, error = %e, "Entity recognition failed");
                (AttemptOutcome::Failed { reason: e.to_string() }, Vec::new())
            }
        }
    }

    /// Resolve each company in turn. Blank names are skipped.
    pub async fn resolve_all<S: AsRef<str>>(
        &self,
        companies: &[S],
        query: &dyn SourceQuery,
    ) -> BatchResolution {
        let start = Instant::now();
        let mut batch = BatchResolution::default();

        for (i, company) in companies.iter().enumerate() {
            let company = company.as_ref().trim();
            if company.is_empty() {
                batch.stats.skipped += 1;
                continue;
            }

            if batch.stats.companies > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            tracing::info!(%company, index = i + 1, total = companies.len(), "Processing company");

            let result = self.resolve_founder(company, query).await;
            batch.stats.record(&result);
            batch.results.push(result);
        }

        batch.stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        batch
    }
}

/// True when every token of `name` also appears in `company`.
fn is_company_name(name: &str, company: &str) -> bool {
    let company_tokens: HashSet<String> = company.split_whitespace().map(bare_token).collect();
    name.split_whitespace()
        .all(|token| company_tokens.contains(&bare_token(token)))
}

fn bare_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
