use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;
use dashmap::DashMap;

/// Document-frequency table of a training corpus.
///
/// Keeps, in a thread-safe way:
/// - the number of documents added
/// - for each term, the number of documents in which it appears
///
/// It never stores document text. It is the base data for vocabulary
/// filtering and IDF calculation, and can be filled from many threads at once.
#[derive(Debug, Default)]
pub struct DocumentFrequency {
    /// number of documents added
    pub add_num: AtomicU64,
    /// term -> document count
    pub term_counts: DashMap<Box<str>, u64, RandomState>,
}

impl Clone for DocumentFrequency {
    fn clone(&self) -> Self {
        Self {
            add_num: AtomicU64::new(self.add_num.load(Ordering::Acquire)),
            term_counts: self.term_counts.clone(),
        }
    }
}

impl DocumentFrequency {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            add_num: AtomicU64::new(0),
            term_counts: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Add one document given its distinct terms
    pub fn add_set<T>(&self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.add_num.fetch_add(1, Ordering::Relaxed);
        for term in terms {
            self.term_counts
                .entry(term.as_ref().into())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Number of documents in the corpus
    pub fn get_doc_num(&self) -> u64 {
        self.add_num.load(Ordering::Relaxed)
    }

    /// Number of documents containing `term`
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).map_or(0, |count| *count)
    }

    /// All `(term, document count)` pairs, unordered
    pub fn entries(&self) -> Vec<(Box<str>, u64)> {
        self.term_counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn counts_documents_not_occurrences() {
        let df = DocumentFrequency::new();
        df.add_set(&["good", "film"]);
        df.add_set(&["good"]);
        assert_eq!(df.get_doc_num(), 2);
        assert_eq!(df.get_term_count("good"), 2);
        assert_eq!(df.get_term_count("film"), 1);
        assert_eq!(df.get_term_count("bad"), 0);
        assert_eq!(df.entries().len(), 2);
    }

    #[test]
    fn parallel_fill_matches_sequential() {
        let docs: Vec<Vec<String>> = (0..500)
            .map(|i| vec![format!("t{}", i % 7), "common".to_string()])
            .collect();
        let df = DocumentFrequency::new();
        docs.par_iter().for_each(|terms| df.add_set(terms));
        assert_eq!(df.get_doc_num(), 500);
        assert_eq!(df.get_term_count("common"), 500);
        assert_eq!(df.get_term_count("t0"), 72);
    }
}
