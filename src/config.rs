//! Run configuration
//!
//! One immutable [`AnalysisConfig`] value is built per run (defaults, then an
//! optional JSON file, then CLI overrides) and passed explicitly to every task.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierKind, ClassifierParams};
use crate::error::{Error, Result};
use crate::lexicon::ValenceThresholds;
use crate::text::{Normalizer, StopWords};
use crate::vectorizer::VectorizerKind;

/// Number of leading rows used for training
pub const DEFAULT_TRAIN_ROWS: usize = 35_000;

/// Seed shared by every randomized learner
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub normalizer: NormalizerConfig,
    pub features: FeatureConfig,
    pub split: SplitConfig,
    pub classifier: ClassifierConfig,
    /// Declared supervised classes, in report order
    pub classes: Vec<String>,
    pub valence: ValenceThresholds,
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            features: FeatureConfig::default(),
            split: SplitConfig::default(),
            classifier: ClassifierConfig::default(),
            classes: vec!["positive".to_string(), "negative".to_string()],
            valence: ValenceThresholds::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a JSON file; absent sections keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: AnalysisConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let features = &self.features;
        let (min_n, max_n) = features.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidConfig(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }
        crate::vectorizer::check_document_frequency((features.min_df, features.max_df))?;
        if self.classes.is_empty() {
            return Err(Error::InvalidConfig("class list is empty".to_string()));
        }
        if self.split.train_rows == 0 {
            return Err(Error::InvalidConfig("train_rows must be positive".to_string()));
        }
        if self.valence.negative > self.valence.positive {
            return Err(Error::InvalidConfig(format!(
                "valence thresholds out of order ({}, {})",
                self.valence.negative, self.valence.positive
            )));
        }
        self.classifier.params.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Start from the built-in English stop-word list
    pub use_english: bool,
    pub extra_stop_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            use_english: true,
            extra_stop_words: Vec::new(),
        }
    }
}

impl NormalizerConfig {
    pub fn build(&self) -> Normalizer {
        let base = if self.use_english {
            StopWords::english()
        } else {
            StopWords::none()
        };
        let stop_words = if self.extra_stop_words.is_empty() {
            base
        } else {
            base.extend(&self.extra_stop_words)
        };
        Normalizer::new(stop_words)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub kind: VectorizerKind,
    /// Inclusive n-gram range
    pub ngram_range: (usize, usize),
    /// Minimum document proportion for a term to become a column
    pub min_df: f64,
    /// Maximum document proportion for a term to become a column
    pub max_df: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            kind: VectorizerKind::Tfidf,
            ngram_range: (1, 2),
            min_df: 0.0,
            max_df: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_rows: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_rows: DEFAULT_TRAIN_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub kind: ClassifierKind,
    pub params: ClassifierParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.split.train_rows, 35_000);
        assert_eq!(config.features.ngram_range, (1, 2));
        assert_eq!(config.classes, vec!["positive", "negative"]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.valence.negative, -0.05);
        assert_eq!(config.valence.positive, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"features": {{"kind": "bow", "min_df": 0.01}}, "split": {{"train_rows": 100}}}}"#
        )
        .unwrap();
        let config = AnalysisConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.features.kind, VectorizerKind::Count);
        assert_eq!(config.features.min_df, 0.01);
        assert_eq!(config.features.max_df, 1.0);
        assert_eq!(config.split.train_rows, 100);
        assert_eq!(config.classes.len(), 2);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AnalysisConfig::default();
        config.features.min_df = 0.9;
        config.features.max_df = 0.1;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = AnalysisConfig::default();
        config.features.ngram_range = (0, 2);
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.classes.clear();
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.split.train_rows = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.classifier.params.logistic_regression.c = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn extra_stop_words_are_applied() {
        let config = NormalizerConfig {
            use_english: true,
            extra_stop_words: vec!["movie".to_string()],
        };
        let normalizer = config.build();
        assert_eq!(normalizer.normalize("This movie was GREAT"), "great");

        let bare = NormalizerConfig {
            use_english: false,
            extra_stop_words: Vec::new(),
        };
        assert_eq!(bare.build().normalize("This movie"), "this movie");
    }
}
