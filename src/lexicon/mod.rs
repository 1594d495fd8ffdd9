//! Lexicon-based (unsupervised) sentiment scoring
//!
//! Two scorer seams are defined here: [`PolarityScorer`] (polarity plus
//! subjectivity) and [`ValenceScorer`] (a single compound valence). Both
//! report failures per text through [`ScoreError`], so a batch never aborts
//! because of one row.

pub mod polarity;
pub mod valence;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use polarity::PatternLexicon;
pub use valence::ValenceLexicon;

/// Reason a single text could not be scored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// Text is absent or blank
    #[error("missing text")]
    MissingText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity in `[-1, 1]` and subjectivity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScore {
    pub polarity: f64,
    pub subjectivity: f64,
}

pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<PolarityScore, ScoreError>;
}

pub trait ValenceScorer: Send + Sync {
    /// Normalized compound valence in `[-1, 1]`
    fn compound(&self, text: &str) -> Result<f64, ScoreError>;
}

/// Sign of the polarity; exactly zero is neutral
pub fn polarity_label(polarity: f64) -> Sentiment {
    if polarity < 0.0 {
        Sentiment::Negative
    } else if polarity == 0.0 {
        Sentiment::Neutral
    } else {
        Sentiment::Positive
    }
}

/// Cut points for [`valence_label`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValenceThresholds {
    pub negative: f64,
    pub positive: f64,
}

impl Default for ValenceThresholds {
    fn default() -> Self {
        Self {
            negative: -0.05,
            positive: 0.05,
        }
    }
}

/// Both comparisons are strict: a compound equal to a threshold is neutral.
pub fn valence_label(compound: f64, thresholds: &ValenceThresholds) -> Sentiment {
    if compound < thresholds.negative {
        Sentiment::Negative
    } else if compound > thresholds.positive {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Word tokens, case preserved; apostrophes stay inside words (`don't`).
pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_labels() {
        assert_eq!(polarity_label(0.0), Sentiment::Neutral);
        assert_eq!(polarity_label(0.3), Sentiment::Positive);
        assert_eq!(polarity_label(-0.2), Sentiment::Negative);
        assert_eq!(polarity_label(-0.0), Sentiment::Neutral);
    }

    #[test]
    fn valence_threshold_is_strict() {
        let t = ValenceThresholds::default();
        assert_eq!(valence_label(0.05, &t), Sentiment::Neutral);
        assert_eq!(valence_label(-0.05, &t), Sentiment::Neutral);
        assert_eq!(valence_label(0.0501, &t), Sentiment::Positive);
        assert_eq!(valence_label(-0.3, &t), Sentiment::Negative);
    }

    #[test]
    fn sentiment_display_matches_serde() {
        for s in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
            assert_eq!(serde_json::to_string(&s).unwrap(), format!("\"{}\"", s));
        }
    }

    #[test]
    fn word_splitting_keeps_contractions() {
        let got: Vec<&str> = words("Don't stop, 'really' -- ok!").collect();
        assert_eq!(got, vec!["Don't", "stop", "really", "ok"]);
    }
}
