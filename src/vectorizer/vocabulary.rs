use ahash::RandomState;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::corpus::DocumentFrequency;

/// Fitted column space: term -> column index.
///
/// Columns follow lexicographic term order, so two fits on the same
/// corpus always produce the same layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>, RandomState>,
}

impl Vocabulary {
    /// Build the vocabulary from a document-frequency table.
    ///
    /// # Arguments
    /// * `df` - document frequencies of the training corpus
    /// * `min_df` - minimum document proportion (inclusive)
    /// * `max_df` - maximum document proportion (inclusive)
    pub fn from_document_frequency(df: &DocumentFrequency, min_df: f64, max_df: f64) -> Self {
        let doc_num = df.get_doc_num() as f64;
        let min_count = min_df * doc_num;
        let max_count = max_df * doc_num;
        let mut kept: Vec<Box<str>> = df
            .entries()
            .into_iter()
            .filter(|(_, count)| {
                let count = *count as f64;
                count >= min_count && count <= max_count
            })
            .map(|(term, _)| term)
            .collect();
        kept.sort_unstable();
        Self::from_sorted(kept)
    }

    /// Build from terms already in column order
    pub fn from_sorted<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = Box<str>>,
    {
        let mut set = IndexSet::with_hasher(RandomState::new());
        set.extend(terms);
        Self { terms: set }
    }

    /// Column of a term, if it was seen at fit time
    #[inline]
    pub fn column(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Terms in column order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.as_ref())
    }
}
