/// This crate is a review sentiment analysis toolkit: text cleaning, lexicon
/// scoring and supervised classification over bag-of-words / TF-IDF features.
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod lexicon;
pub mod tasks;
pub mod text;
pub mod utils;
pub mod vectorizer;

/// Error and Result types
/// Every fallible operation of the crate returns `error::Result<T>`.
/// Lexicon scoring is the exception: a failing row yields a `lexicon::ScoreError`
/// inside its own result so one bad row never aborts a batch.
pub use error::{Error, Result};

/// Run Configuration
/// One immutable value per run, built from defaults, an optional JSON file and
/// CLI overrides, then passed explicitly to every task.
pub use config::AnalysisConfig;

/// Review Normalizer
/// Strips non-alphanumeric characters, lowercases and removes stop words.
///
/// The normalizer holds its stop-word list; there is no process-wide state.
pub use text::{Normalizer, StopWords};

/// Feature Extraction
/// `CountVectorizer` produces raw term counts, `TfidfVectorizer` produces
/// sublinear, smoothed, L2-normalized TF-IDF weights.
///
/// Both analyze word 1-grams and 2-grams, learn their vocabulary at fit time
/// only and map terms unseen at fit time to nothing.
pub use vectorizer::count::CountVectorizer;
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine, TfidfVectorizer};
pub use vectorizer::{FeatureExtractor, Vectorizer, VectorizerKind};

/// Sparse Feature Matrix
/// Rows are documents, columns are vocabulary terms.
pub use vectorizer::matrix::FeatureMatrix;

/// Classifiers
/// All four learners share the `Classifier` trait and are chosen at run time
/// through `ClassifierKind`.
/// - Linear SVM: hinge loss, L2 penalty, trained by SGD
/// - Logistic Regression: L2-regularized, full-batch gradient descent
/// - Gradient Boosting: shallow regression trees on log-loss gradients
/// - Random Forest: bagged, feature-subsampled classification trees
pub use classifier::{Classifier, ClassifierKind};

/// Evaluation
/// `EvaluationPipeline` runs normalize -> vectorize -> fit -> predict -> score
/// for one `(vectorizer, classifier)` choice.
pub use evaluate::{ClassificationReport, ConfusionMatrix, EvaluationOutcome, EvaluationPipeline, ReportTable};

/// Lexicon Scorers
/// `PatternLexicon` gives polarity and subjectivity,
/// `ValenceLexicon` gives a normalized compound valence.
pub use lexicon::{PatternLexicon, PolarityScorer, Sentiment, ValenceLexicon, ValenceScorer};

/// Tables
/// `ReviewTable` is the CSV dataset read from disk, `Table` is any task output.
pub use dataset::{ReviewTable, Table};
