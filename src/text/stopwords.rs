use std::{collections::HashSet, sync::Arc};

use ahash::RandomState;

/// English stop-word list (the 179-word list shipped by common NLP toolkits)
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't",
    "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
    "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Immutable stop-word set.
/// Cheap to clone, the set itself is shared.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: Arc<HashSet<Box<str>, RandomState>>,
}

impl StopWords {
    /// Built-in English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// No stop words at all
    pub fn none() -> Self {
        Self::from_words(std::iter::empty::<&str>())
    }

    /// Build from any word list; words are lowercased
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase().into_boxed_str())
            .collect();
        Self {
            words: Arc::new(words),
        }
    }

    /// New set containing `self` plus `extra`
    pub fn extend<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: HashSet<Box<str>, RandomState> = (*self.words).clone();
        words.extend(extra.into_iter().map(|w| w.as_ref().to_lowercase().into_boxed_str()));
        Self {
            words: Arc::new(words),
        }
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_has_expected_size_and_members() {
        let sw = StopWords::english();
        assert_eq!(sw.len(), 179);
        assert!(sw.contains("i"));
        assert!(sw.contains("this"));
        assert!(sw.contains("wouldn't"));
        assert!(!sw.contains("love"));
    }

    #[test]
    fn extend_does_not_touch_original() {
        let base = StopWords::english();
        let ext = base.extend(["Movie"]);
        assert!(ext.contains("movie"));
        assert!(!base.contains("movie"));
        assert_eq!(ext.len(), 180);
    }
}
