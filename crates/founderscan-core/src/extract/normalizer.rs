use serde::{Deserialize, Serialize};

/// Page text after normalization.
///
/// Contains only word characters, single spaces, commas and periods, with no
/// leading or trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    lowercase: bool,
}

impl TextNormalizer {
    #[must_use]
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    #[must_use]
    pub fn lowercases(&self) -> bool {
        self.lowercase
    }

    /// Collapse whitespace, drop everything but word characters, commas and
    /// periods, optionally lower-case, and trim.
    ///
    /// Characters are dropped before whitespace is collapsed, so `"a ! b"`
    /// becomes `"a b"` rather than keeping a double space.
    #[must_use]
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let mut out = String::with_capacity(text.len());
        let mut pending_space = false;

        for c in text.chars() {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }

            if self.lowercase {
                for lower in c.to_lowercase() {
                    push_kept(&mut out, lower, &mut pending_space);
                }
            } else {
                push_kept(&mut out, c, &mut pending_space);
            }
        }

        NormalizedText(out)
    }
}

fn push_kept(out: &mut String, c: char, pending_space: &mut bool) {
    if !is_kept(c) {
        return;
    }
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
    out.push(c);
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ',' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_whitespace_and_trims() {
        let normalizer = TextNormalizer::new(false);
        let text = normalizer.normalize("  Jane \t Doe\n\nfounded  Acme.  ");
        assert_eq!(text.as_str(), "Jane Doe founded Acme.");
    }

    #[test]
    fn test_strips_punctuation() {
        let normalizer = TextNormalizer::new(false);
        let text = normalizer.normalize("Acme (co-founded by Jane Doe!) sells widgets, gadgets.");
        assert_eq!(text.as_str(), "Acme cofounded by Jane Doe sells widgets, gadgets.");
    }

    #[test]
    fn test_removed_characters_do_not_leave_double_spaces() {
        let normalizer = TextNormalizer::new(false);
        assert_eq!(normalizer.normalize("a ! b").as_str(), "a b");
        assert_eq!(normalizer.normalize("! leading").as_str(), "leading");
    }

    #[test]
    fn test_lowercase_policy() {
        let lower = TextNormalizer::new(true);
        let preserve = TextNormalizer::new(false);

        assert_eq!(lower.normalize("Jane DOE").as_str(), "jane doe");
        assert_eq!(preserve.normalize("Jane DOE").as_str(), "Jane DOE");
        assert!(lower.lowercases());
    }

    #[test]
    fn test_keeps_unicode_letters() {
        let normalizer = TextNormalizer::new(false);
        assert_eq!(normalizer.normalize("José Müller_2").as_str(), "José Müller_2");
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::default();
        assert!(normalizer.normalize("").is_empty());
        assert!(normalizer.normalize(" \n\t ").is_empty());
        assert!(normalizer.normalize("!?#").is_empty());
    }

    fn assert_invariant(text: &str) {
        assert!(!text.contains("  "));
        assert_eq!(text, text.trim());
        assert!(text.chars().all(|c| c == ' ' || is_kept(c)));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(input in any::<String>()) {
            let normalizer = TextNormalizer::new(false);
            let once = normalizer.normalize(&input);
            let twice = normalizer.normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_lowercase_normalize_is_idempotent(input in "[a-zA-Z0-9 \t\n,.!?'_éÉßÆ-]{0,200}") {
            let normalizer = TextNormalizer::new(true);
            let once = normalizer.normalize(&input);
            let twice = normalizer.normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_normalized_text_holds_invariant(input in any::<String>(), lowercase in any::<bool>()) {
            let text = TextNormalizer::new(lowercase).normalize(&input);
            assert_invariant(text.as_str());
        }
    }
}
