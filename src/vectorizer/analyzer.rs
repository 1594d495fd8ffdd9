use regex::Regex;

use crate::error::{Error, Result};

/// Default token pattern: runs of two or more word characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Turns a document into its n-gram terms.
///
/// The document is lowercased, tokens are extracted with the token pattern and
/// every n-gram with `n` in `ngram_range` (inclusive) is emitted. Tokens of an
/// n-gram are joined with a single space, so `("great", "movie")` becomes `"great movie"`.
#[derive(Debug, Clone)]
pub struct NgramAnalyzer {
    token_pattern: Regex,
    ngram_range: (usize, usize),
}

impl NgramAnalyzer {
    pub fn new(ngram_range: (usize, usize)) -> Result<Self> {
        Self::with_pattern(DEFAULT_TOKEN_PATTERN, ngram_range)
    }

    pub fn with_pattern(pattern: &str, ngram_range: (usize, usize)) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidConfig(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(Self {
            token_pattern: Regex::new(pattern)?,
            ngram_range,
        })
    }

    #[inline]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    /// Tokens of a document, before n-gram expansion
    pub fn tokenize(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// All n-gram terms of a document, in document order (unigrams first)
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let tokens = self.tokenize(doc);
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unigrams_and_bigrams() {
        let a = NgramAnalyzer::new((1, 2)).unwrap();
        assert_eq!(
            a.analyze("Great movie plot"),
            vec!["great", "movie", "plot", "great movie", "movie plot"]
        );
    }

    #[test]
    fn single_char_tokens_are_skipped() {
        let a = NgramAnalyzer::new((1, 2)).unwrap();
        assert_eq!(a.analyze("a b love 1 10"), vec!["love", "10", "love 10"]);
    }

    #[test]
    fn short_documents() {
        let a = NgramAnalyzer::new((1, 2)).unwrap();
        assert!(a.analyze("").is_empty());
        assert_eq!(a.analyze("solo"), vec!["solo"]);
    }

    #[test]
    fn rejects_bad_range() {
        assert!(NgramAnalyzer::new((0, 1)).is_err());
        assert!(NgramAnalyzer::new((3, 2)).is_err());
    }
}
