use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::persons::CandidateName;

/// A candidate that passed [`NameValidator`]: at least the configured number
/// of tokens and no blocklisted token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedName(String);

impl ValidatedName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ValidatedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidatedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ValidatedName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone)]
pub struct NameValidator {
    min_tokens: usize,
    blocklist: HashSet<String>,
}

impl NameValidator {
    pub fn new<I, S>(min_tokens: usize, blocklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_tokens,
            blocklist: blocklist
                .into_iter()
                .map(|term| term.as_ref().trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    /// Whether `name` reads like a real person's full name.
    ///
    /// Tokens are compared to the blocklist with surrounding punctuation
    /// removed, so `"Acme, LLC"` is caught by `llc`.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        if tokens.len() < self.min_tokens {
            return false;
        }

        !tokens.iter().any(|token| {
            let bare = token.trim_matches(|c: char| !c.is_alphanumeric());
            self.blocklist.contains(&bare.to_lowercase())
        })
    }

    /// Order-preserving filter; rejected names are dropped silently.
    #[must_use]
    pub fn validate(&self, names: Vec<CandidateName>) -> Vec<ValidatedName> {
        names
            .into_iter()
            .filter(|name| {
                let accepted = self.accepts(name.as_str());
                if !accepted {
                    tracing::trace!(name = %name, "Rejected candidate name");
                }
                accepted
            })
            .map(|name| ValidatedName(name.into_string()))
            .collect()
    }
}
