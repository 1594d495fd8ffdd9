//! Feature extraction: n-gram analysis, vocabulary fitting and sparse
//! bag-of-words / TF-IDF matrices.

pub mod analyzer;
pub mod corpus;
pub mod count;
pub mod matrix;
pub mod term;
pub mod tfidf;
pub mod vocabulary;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::error::{Error, Result};

use self::{
    analyzer::NgramAnalyzer, corpus::DocumentFrequency, count::CountVectorizer,
    matrix::FeatureMatrix, term::TermFrequency, tfidf::TfidfVectorizer, vocabulary::Vocabulary,
};

/// Fit-then-transform feature extractor.
///
/// The instance fitted on the training corpus is the one that transforms
/// the test corpus; nothing is learned from `transform`.
pub trait FeatureExtractor {
    /// Learn the vocabulary (and weights) from a corpus
    fn fit<S>(&mut self, corpus: &[S]) -> Result<()>
    where
        S: AsRef<str> + Sync;

    /// Map a corpus onto the fitted column space
    fn transform<S>(&self, corpus: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync;

    fn fit_transform<S>(&mut self, corpus: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync,
    {
        self.fit(corpus)?;
        self.transform(corpus)
    }

    /// Fitted vocabulary, `None` before fit
    fn vocabulary(&self) -> Option<&Vocabulary>;
}

/// Which feature representation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VectorizerKind {
    /// Bag of words (raw counts)
    #[serde(rename = "bow")]
    Count,
    #[default]
    #[serde(rename = "tfidf")]
    Tfidf,
}

impl VectorizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorizerKind::Count => "bow",
            VectorizerKind::Tfidf => "tfidf",
        }
    }
}

impl fmt::Display for VectorizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bow" | "count" => Ok(VectorizerKind::Count),
            "tfidf" | "tf-idf" => Ok(VectorizerKind::Tfidf),
            other => Err(Error::InvalidConfig(format!("unknown feature kind: {}", other))),
        }
    }
}

/// Vectorizer chosen at runtime
#[derive(Debug, Clone)]
pub enum Vectorizer {
    Count(CountVectorizer),
    Tfidf(TfidfVectorizer),
}

impl Vectorizer {
    pub fn from_config(config: &FeatureConfig) -> Result<Self> {
        let df = (config.min_df, config.max_df);
        Ok(match config.kind {
            VectorizerKind::Count => Vectorizer::Count(CountVectorizer::new(config.ngram_range, df)?),
            VectorizerKind::Tfidf => Vectorizer::Tfidf(TfidfVectorizer::new(config.ngram_range, df)?),
        })
    }

    pub fn kind(&self) -> VectorizerKind {
        match self {
            Vectorizer::Count(_) => VectorizerKind::Count,
            Vectorizer::Tfidf(_) => VectorizerKind::Tfidf,
        }
    }
}

impl FeatureExtractor for Vectorizer {
    fn fit<S>(&mut self, corpus: &[S]) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        match self {
            Vectorizer::Count(v) => v.fit(corpus),
            Vectorizer::Tfidf(v) => v.fit(corpus),
        }
    }

    fn transform<S>(&self, corpus: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync,
    {
        match self {
            Vectorizer::Count(v) => v.transform(corpus),
            Vectorizer::Tfidf(v) => v.transform(corpus),
        }
    }

    fn vocabulary(&self) -> Option<&Vocabulary> {
        match self {
            Vectorizer::Count(v) => v.vocabulary(),
            Vectorizer::Tfidf(v) => v.vocabulary(),
        }
    }
}

pub(crate) fn check_document_frequency((min_df, max_df): (f64, f64)) -> Result<()> {
    let in_unit = |v: f64| (0.0..=1.0).contains(&v);
    if !in_unit(min_df) || !in_unit(max_df) || min_df > max_df {
        return Err(Error::InvalidConfig(format!(
            "document frequency bounds must satisfy 0 <= min_df <= max_df <= 1, got ({}, {})",
            min_df, max_df
        )));
    }
    Ok(())
}

/// Per-document term counts, in corpus order
pub(crate) fn analyze_corpus<S>(analyzer: &NgramAnalyzer, corpus: &[S]) -> Vec<TermFrequency>
where
    S: AsRef<str> + Sync,
{
    corpus
        .par_iter()
        .map(|doc| analyzer.analyze(doc.as_ref()).into_iter().collect())
        .collect()
}

/// Fails with `EmptyVocabulary` when no term survives
pub(crate) fn fit_vocabulary(
    freqs: &[TermFrequency],
    min_df: f64,
    max_df: f64,
) -> Result<(Vocabulary, DocumentFrequency)> {
    let df = DocumentFrequency::new();
    freqs
        .par_iter()
        .for_each(|freq| df.add_set(freq.term_set_ref_str().as_slice()));
    let vocabulary = Vocabulary::from_document_frequency(&df, min_df, max_df);
    if vocabulary.is_empty() {
        return Err(Error::EmptyVocabulary);
    }
    Ok((vocabulary, df))
}
