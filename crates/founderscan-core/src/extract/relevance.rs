use super::normalizer::NormalizedText;

/// Keeps only the sentences that talk about founding.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn is_relevant(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Relevant sentences of `text`, in source order.
    pub fn relevant_sentences<'a>(
        &'a self,
        text: &'a NormalizedText,
    ) -> impl Iterator<Item = &'a str> + 'a {
        sentences(text).filter(move |s| self.is_relevant(s))
    }

    /// Join the relevant sentences of `text` with single spaces, in source
    /// order. Returns an empty string when nothing matches.
    #[must_use]
    pub fn filter(&self, text: &NormalizedText) -> String {
        self.relevant_sentences(text).collect::<Vec<_>>().join(" ")
    }
}

/// Period-delimited sentences of `text`, trimmed, empty ones skipped.
pub fn sentences(text: &NormalizedText) -> impl Iterator<Item = &str> {
    text.as_str()
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::extract::TextNormalizer;
    use proptest::prelude::*;

    fn default_filter() -> RelevanceFilter {
        RelevanceFilter::new(PipelineConfig::default().keywords)
    }

    fn normalized(text: &str) -> NormalizedText {
        TextNormalizer::new(false).normalize(text)
    }

    #[test]
    fn test_keeps_only_founder_sentences() {
        let filter = default_filter();
        let text = normalized("Jane Doe is the founder of Acme. Acme sells widgets.");

        assert_eq!(filter.filter(&text), "Jane Doe is the founder of Acme");
    }

    #[test]
    fn test_preserves_sentence_order() {
        let filter = default_filter();
        let text = normalized(
            "Acme was Founded by Jane Doe. It grew fast. Later, John Roe became a co-founder.",
        );

        assert_eq!(
            filter.filter(&text),
            "Acme was Founded by Jane Doe Later, John Roe became a cofounder"
        );
    }

    #[test]
    fn test_no_match_returns_empty() {
        let filter = default_filter();
        let text = normalized("Visit our website for more info.");

        assert!(filter.filter(&text).is_empty());
    }

    #[test]
    fn test_custom_keywords() {
        let filter = RelevanceFilter::new(["CEO", "  "]);
        assert_eq!(filter.keywords(), ["ceo".to_string()]);
        assert!(filter.is_relevant("the ceo said"));
        assert!(!filter.is_relevant("the founder said"));
    }

    #[test]
    fn test_sentences_skip_empty() {
        let text = normalized("One.. Two. ");
        assert_eq!(sentences(&text).collect::<Vec<_>>(), vec!["One", "Two"]);
    }

    proptest! {
        #[test]
        fn prop_every_kept_sentence_has_keyword(
            parts in prop::collection::vec(
                prop::sample::select(vec![
                    "Jane Doe is the founder",
                    "Acme sells widgets",
                    "it was founded by John Roe",
                    "the FOUNDER of Acme",
                    "nothing here",
                    "co-founder Mary Major",
                ]),
                0..8,
            )
        ) {
            let filter = default_filter();
            let text = normalized(&parts.join(". "));

            let kept: Vec<&str> = filter.relevant_sentences(&text).collect();
            for sentence in &kept {
                let lower = sentence.to_lowercase();
                prop_assert!(["founder", "founded by"].iter().any(|k| lower.contains(k)));
            }

            let expected = parts.iter().filter(|p| p.to_lowercase().contains("found")).count();
            prop_assert_eq!(kept.len(), expected);
            prop_assert_eq!(filter.filter(&text), kept.join(" "));
        }
    }
}
