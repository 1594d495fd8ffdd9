use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::vector::ZeroSpVec;

use super::{
    analyzer::NgramAnalyzer, analyze_corpus, check_document_frequency, fit_vocabulary,
    matrix::FeatureMatrix, vocabulary::Vocabulary, FeatureExtractor,
};

/// Bag-of-words vectorizer: raw n-gram counts, no weighting.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    analyzer: NgramAnalyzer,
    document_frequency: (f64, f64),
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    /// # Arguments
    /// * `ngram_range` - inclusive `(min_n, max_n)`
    /// * `document_frequency` - `(min_df, max_df)` as proportions of the training documents
    pub fn new(ngram_range: (usize, usize), document_frequency: (f64, f64)) -> Result<Self> {
        check_document_frequency(document_frequency)?;
        Ok(Self {
            analyzer: NgramAnalyzer::new(ngram_range)?,
            document_frequency,
            vocabulary: None,
        })
    }

    /// Count rows against a fitted vocabulary
    pub(crate) fn count_matrix<S>(
        analyzer: &NgramAnalyzer,
        vocabulary: &Vocabulary,
        corpus: &[S],
    ) -> Vec<ZeroSpVec<f64>>
    where
        S: AsRef<str> + Sync,
    {
        let n_cols = vocabulary.len();
        analyze_corpus(analyzer, corpus)
            .into_iter()
            .map(|freq| {
                let entries = freq
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary.column(term).map(|col| (col as u32, count as f64))
                    })
                    .collect();
                ZeroSpVec::from_entries(n_cols, entries)
            })
            .collect()
    }
}

impl FeatureExtractor for CountVectorizer {
    fn fit<S>(&mut self, corpus: &[S]) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        let freqs = analyze_corpus(&self.analyzer, corpus);
        let (min_df, max_df) = self.document_frequency;
        let (vocabulary, _) = fit_vocabulary(&freqs, min_df, max_df)?;
        debug!(docs = corpus.len(), terms = vocabulary.len(), "count vectorizer fitted");
        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    fn transform<S>(&self, corpus: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync,
    {
        let vocabulary = self.vocabulary.as_ref().ok_or(Error::NotFitted)?;
        let rows = Self::count_matrix(&self.analyzer, vocabulary, corpus);
        Ok(FeatureMatrix::new(rows, vocabulary.len()))
    }

    fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }
}
