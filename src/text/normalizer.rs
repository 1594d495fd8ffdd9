use rayon::prelude::*;

use super::stopwords::StopWords;

/// Review text normalizer
///
/// Steps, in order:
/// 1. drop every char that is not an ASCII letter, ASCII digit or whitespace
/// 2. lowercase
/// 3. trim
/// 4. split on whitespace
/// 5. drop stop words
/// 6. join with single spaces
///
/// The normalizer is an immutable value; it is built once per run and passed
/// wherever text has to be cleaned.
///
/// # Examples
/// ```
/// use review_sentiment::Normalizer;
/// let normalizer = Normalizer::english();
/// assert_eq!(normalizer.normalize("I LOVE this!!! 123"), "love 123");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stop_words: StopWords,
}

impl Normalizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Normalizer with the built-in English stop words
    pub fn english() -> Self {
        Self::new(StopWords::english())
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Normalize a single document. Never fails; anything unusable becomes an empty string.
    pub fn normalize(&self, doc: &str) -> String {
        let stripped: String = doc
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let mut out = String::with_capacity(stripped.len());
        for token in stripped.trim().split_whitespace() {
            if self.stop_words.contains(token) {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
        out
    }

    /// Normalize every document, preserving order
    pub fn normalize_corpus<S>(&self, docs: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        docs.par_iter().map(|doc| self.normalize(doc.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_lowercases_and_drops_stop_words() {
        let n = Normalizer::english();
        assert_eq!(n.normalize("I LOVE this!!! 123"), "love 123");
        assert_eq!(n.normalize("  The movie   was GREAT.\n"), "movie great");
    }

    #[test]
    fn degrades_to_empty() {
        let n = Normalizer::english();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("!!! ??? ..."), "");
        assert_eq!(n.normalize("it is what it is"), "");
    }

    #[test]
    fn non_ascii_letters_are_removed() {
        let n = Normalizer::english();
        assert_eq!(n.normalize("café naïve 😀 ok"), "caf nave ok");
    }

    #[test]
    fn apostrophes_merge_before_stop_word_check() {
        // "don't" becomes "dont", which is not in the list
        let n = Normalizer::english();
        assert_eq!(n.normalize("I don't like it"), "dont like");
    }

    #[test]
    fn idempotent_and_restricted_alphabet() {
        let n = Normalizer::english();
        let docs = [
            "Worst. Film. EVER!!! 0/10 <br /><br />would not watch again",
            "Loved every minute -- 10/10, a masterpiece; Ünïcödé too",
            "\tmixed\u{00A0}whitespace\r\nlines ",
            "",
        ];
        for doc in docs {
            let once = n.normalize(doc);
            assert_eq!(n.normalize(&once), once);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn corpus_preserves_order_and_length() {
        let n = Normalizer::english();
        let docs = vec!["Good film", "", "Bad acting!", "the end"];
        let out = n.normalize_corpus(&docs);
        assert_eq!(out, vec!["good film", "", "bad acting", "end"]);
    }

    #[test]
    fn custom_stop_words() {
        let n = Normalizer::new(StopWords::none());
        assert_eq!(n.normalize("I LOVE this"), "i love this");
    }
}
