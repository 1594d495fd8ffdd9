use std::marker::PhantomData;

use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::math::vector::ZeroSpVec;

use super::{
    analyzer::NgramAnalyzer, analyze_corpus, check_document_frequency, corpus::DocumentFrequency,
    count::CountVectorizer, fit_vocabulary, matrix::FeatureMatrix, vocabulary::Vocabulary,
    FeatureExtractor,
};

/// TF-IDF weighting scheme.
///
/// Implement it to plug a different TF or IDF formula into [`TfidfVectorizer`].
pub trait TFIDFEngine {
    /// IDF weight of every vocabulary column, in column order
    /// # Arguments
    /// * `df` - document frequencies of the training corpus
    /// * `vocabulary` - fitted columns
    fn idf_vec(df: &DocumentFrequency, vocabulary: &Vocabulary) -> Vec<f64>;

    /// TF weight of a raw in-document count (count > 0)
    fn tf(count: f64) -> f64;

    /// Row normalization applied after weighting
    fn normalize(row: &mut ZeroSpVec<f64>) {
        row.l2_normalize();
    }
}

/// Smooth IDF, sublinear TF, L2 rows
///
/// - tf = 1 + ln(count)
/// - idf = ln((1 + n) / (1 + df)) + 1
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(df: &DocumentFrequency, vocabulary: &Vocabulary) -> Vec<f64> {
        let doc_num = df.get_doc_num() as f64;
        vocabulary
            .iter()
            .map(|term| {
                let doc_freq = df.get_term_count(term) as f64;
                ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect()
    }

    #[inline]
    fn tf(count: f64) -> f64 {
        1.0 + count.ln()
    }
}

#[derive(Debug, Clone)]
struct FittedTfidf {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
}

/// TF-IDF vectorizer over unigram and bigram terms.
///
/// The IDF vector is learned at fit time and frozen: transforming the test
/// split reuses the training vocabulary and weights.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    analyzer: NgramAnalyzer,
    document_frequency: (f64, f64),
    fitted: Option<FittedTfidf>,
    _marker: PhantomData<E>,
}

impl<E> TfidfVectorizer<E>
where
    E: TFIDFEngine,
{
    /// # Arguments
    /// * `ngram_range` - inclusive `(min_n, max_n)`
    /// * `document_frequency` - `(min_df, max_df)` as proportions of the training documents
    pub fn new(ngram_range: (usize, usize), document_frequency: (f64, f64)) -> Result<Self> {
        check_document_frequency(document_frequency)?;
        Ok(Self {
            analyzer: NgramAnalyzer::new(ngram_range)?,
            document_frequency,
            fitted: None,
            _marker: PhantomData,
        })
    }

    /// Learned IDF weights in column order
    pub fn idf(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.idf.as_slice())
    }
}

impl<E> FeatureExtractor for TfidfVectorizer<E>
where
    E: TFIDFEngine,
{
    fn fit<S>(&mut self, corpus: &[S]) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        let freqs = analyze_corpus(&self.analyzer, corpus);
        let (min_df, max_df) = self.document_frequency;
        let (vocabulary, df) = fit_vocabulary(&freqs, min_df, max_df)?;
        let idf = E::idf_vec(&df, &vocabulary);
        debug!(docs = corpus.len(), terms = vocabulary.len(), "tf-idf vectorizer fitted");
        self.fitted = Some(FittedTfidf { vocabulary, idf });
        Ok(())
    }

    fn transform<S>(&self, corpus: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync,
    {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        let mut rows = CountVectorizer::count_matrix(&self.analyzer, &fitted.vocabulary, corpus);
        for row in rows.iter_mut() {
            row.map_values(|col, count| E::tf(count) * fitted.idf[col]);
            E::normalize(row);
        }
        Ok(FeatureMatrix::new(rows, fitted.vocabulary.len()))
    }

    fn vocabulary(&self) -> Option<&Vocabulary> {
        self.fitted.as_ref().map(|f| &f.vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(ngram_range: (usize, usize)) -> TfidfVectorizer {
        TfidfVectorizer::new(ngram_range, (0.0, 1.0)).unwrap()
    }

    #[test]
    fn transform_before_fit_fails() {
        let tv = vectorizer((1, 2));
        assert!(matches!(tv.transform(&["good"]), Err(Error::NotFitted)));
        assert!(tv.idf().is_none());
    }

    #[test]
    fn smooth_idf_and_unit_rows() {
        let mut tv = vectorizer((1, 1));
        let x = tv.fit_transform(&["good movie", "bad movie"]).unwrap();
        let vocab = tv.vocabulary().unwrap();
        let idf = tv.idf().unwrap();
        let good = vocab.column("good").unwrap();
        let movie = vocab.column("movie").unwrap();
        assert!((idf[movie] - 1.0).abs() < 1e-12);
        assert!((idf[good] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);

        let norm = (idf[good].powi(2) + 1.0).sqrt();
        assert!((x.get(0, good) - idf[good] / norm).abs() < 1e-12);
        assert!((x.get(0, movie) - 1.0 / norm).abs() < 1e-12);
        for row in x.rows() {
            assert!((row.norm_sq::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sublinear_tf() {
        let mut tv = vectorizer((1, 1));
        tv.fit(&["great great great", "great plot"]).unwrap();
        let x = tv.transform(&["great great plot"]).unwrap();
        let vocab = tv.vocabulary().unwrap();
        let idf = tv.idf().unwrap();
        let great = (1.0 + 2.0f64.ln()) * idf[vocab.column("great").unwrap()];
        let plot = idf[vocab.column("plot").unwrap()];
        let ratio = x.get(0, vocab.column("great").unwrap()) / x.get(0, vocab.column("plot").unwrap());
        assert!((ratio - great / plot).abs() < 1e-9);
    }

    #[test]
    fn fit_without_terms_fails() {
        let mut tv = vectorizer((1, 2));
        assert!(matches!(tv.fit(&["", "a"]), Err(Error::EmptyVocabulary)));
        assert!(tv.idf().is_none());
        let mut pruned: TfidfVectorizer = TfidfVectorizer::new((1, 1), (0.0, 0.4)).unwrap();
        assert!(matches!(
            pruned.fit(&["good film", "good film"]),
            Err(Error::EmptyVocabulary)
        ));
    }

    #[test]
    fn empty_and_unseen_documents_stay_zero() {
        let mut tv = vectorizer((1, 2));
        tv.fit(&["loved it great acting", "awful boring plot"]).unwrap();
        let x = tv.transform(&["", "zzz qqq"]).unwrap();
        assert_eq!(x.n_rows(), 2);
        assert_eq!(x.nnz(), 0);
        assert_eq!(x.n_cols(), tv.vocabulary().unwrap().len());
    }
}
