//! One function per analysis task
//!
//! Every task takes a loaded [`ReviewTable`] plus the collaborators it needs
//! and returns a [`Table`] ready to be written, so the CLI only parses
//! arguments and prints.

use std::fmt;

use ahash::RandomState;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::dataset::{ReviewTable, Table, CLEAN_REVIEW, REVIEW, SENTIMENT};
use crate::error::Result;
use crate::evaluate::{EvaluationOutcome, EvaluationPipeline};
use crate::lexicon::{
    polarity_label, valence_label, PolarityScore, PolarityScorer, ScoreError, Sentiment,
    ValenceScorer, ValenceThresholds,
};
use crate::text::Normalizer;

/// Occurrences of each label, most frequent first; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    counts: Vec<(String, usize)>,
}

impl LabelCounts {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen: IndexMap<&str, usize, RandomState> = IndexMap::default();
        for label in labels {
            *seen.entry(label).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = seen
            .into_iter()
            .map(|(label, n)| (label.to_string(), n))
            .collect();
        // stable: equal counts stay in insertion order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self { counts }
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(l, n)| (l.as_str(), *n))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for LabelCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .map(|(l, _)| l.len())
            .max()
            .unwrap_or(0)
            .max(SENTIMENT.len());
        write!(f, "{:width$} {:>8}", SENTIMENT, "count")?;
        for (label, n) in &self.counts {
            write!(f, "\n{:width$} {:>8}", label, n)?;
        }
        Ok(())
    }
}

/// Output of a lexicon task: the scored rows plus a summary of their labels
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    pub table: Table,
    /// Labels of the rows that scored successfully
    pub counts: LabelCounts,
    /// Rows whose score is an error
    pub failures: usize,
}

/// One sentence through the polarity scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentenceScore {
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: Sentiment,
}

/// Column cells with missing values as empty strings
fn column_or_empty<'a>(table: &'a ReviewTable, name: &str) -> Result<Vec<&'a str>> {
    Ok(table
        .column(name)?
        .into_iter()
        .map(|cell| cell.unwrap_or(""))
        .collect())
}

fn error_cell<T>(result: &std::result::Result<T, ScoreError>) -> String {
    match result {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Value counts of the `sentiment` column; missing cells are skipped
pub fn inspect(table: &ReviewTable) -> Result<LabelCounts> {
    let labels = table.column(SENTIMENT)?;
    Ok(LabelCounts::from_labels(labels.into_iter().flatten()))
}

fn normalized_reviews(table: &ReviewTable, normalizer: &Normalizer) -> Result<(Vec<String>, Vec<String>)> {
    let reviews = column_or_empty(table, REVIEW)?;
    let cleaned = normalizer.normalize_corpus(&reviews);
    let empty = cleaned.iter().filter(|c| c.is_empty()).count();
    if empty > 0 {
        debug!(rows = empty, "reviews empty after cleaning");
    }
    let reviews = reviews.into_iter().map(str::to_string).collect();
    Ok((reviews, cleaned))
}

/// `Review, Clean Review`
pub fn clean(table: &ReviewTable, normalizer: &Normalizer) -> Result<Table> {
    let (reviews, cleaned) = normalized_reviews(table, normalizer)?;
    let mut out = Table::new([REVIEW, CLEAN_REVIEW]);
    for (review, clean) in reviews.into_iter().zip(cleaned) {
        out.push_row(vec![review, clean]);
    }
    info!(rows = out.len(), "cleaned reviews");
    Ok(out)
}

/// `Clean Review, sentiment`, the input of the supervised tasks.
/// Rows whose cleaned text is empty are kept.
pub fn clean_with_sentiment(table: &ReviewTable, normalizer: &Normalizer) -> Result<Table> {
    let labels = column_or_empty(table, SENTIMENT)?;
    let (_, cleaned) = normalized_reviews(table, normalizer)?;
    let mut out = Table::new([CLEAN_REVIEW, SENTIMENT]);
    for (clean, label) in cleaned.into_iter().zip(labels) {
        out.push_row(vec![clean, label.to_string()]);
    }
    info!(rows = out.len(), "cleaned labelled reviews");
    Ok(out)
}

/// `Clean Review, polarity, subjectivity, sentiment, error`.
///
/// A row that fails to score keeps empty score cells and the reason in
/// `error`; the remaining rows are unaffected.
pub fn score_polarity<P>(table: &ReviewTable, scorer: &P) -> Result<ScoredTable>
where
    P: PolarityScorer + ?Sized,
{
    let texts = column_or_empty(table, CLEAN_REVIEW)?;
    let scores: Vec<_> = texts.par_iter().map(|text| scorer.score(text)).collect();

    let mut out = Table::new([CLEAN_REVIEW, "polarity", "subjectivity", SENTIMENT, "error"]);
    let mut labels = Vec::with_capacity(scores.len());
    for (row, (text, score)) in texts.iter().zip(&scores).enumerate() {
        let (polarity, subjectivity, sentiment) = match score {
            Ok(s) => {
                let label = polarity_label(s.polarity);
                labels.push(label.as_str());
                (s.polarity.to_string(), s.subjectivity.to_string(), label.to_string())
            }
            Err(e) => {
                debug!(row, error = %e, "polarity scoring failed");
                (String::new(), String::new(), String::new())
            }
        };
        out.push_row(vec![text.to_string(), polarity, subjectivity, sentiment, error_cell(score)]);
    }

    let failures = scores.len() - labels.len();
    if failures > 0 {
        warn!(failures, "rows could not be scored for polarity");
    }
    Ok(ScoredTable {
        table: out,
        counts: LabelCounts::from_labels(labels),
        failures,
    })
}

/// `Review, compound, sentiment, error`
pub fn score_valence<V>(
    table: &ReviewTable,
    scorer: &V,
    thresholds: &ValenceThresholds,
) -> Result<ScoredTable>
where
    V: ValenceScorer + ?Sized,
{
    let texts = column_or_empty(table, REVIEW)?;
    let scores: Vec<_> = texts.par_iter().map(|text| scorer.compound(text)).collect();

    let mut out = Table::new([REVIEW, "compound", SENTIMENT, "error"]);
    let mut labels = Vec::with_capacity(scores.len());
    for (row, (text, score)) in texts.iter().zip(&scores).enumerate() {
        let (compound, sentiment) = match score {
            Ok(c) => {
                let label = valence_label(*c, thresholds);
                labels.push(label.as_str());
                (c.to_string(), label.to_string())
            }
            Err(e) => {
                debug!(row, error = %e, "valence scoring failed");
                (String::new(), String::new())
            }
        };
        out.push_row(vec![text.to_string(), compound, sentiment, error_cell(score)]);
    }

    let failures = scores.len() - labels.len();
    if failures > 0 {
        warn!(failures, "rows could not be scored for valence");
    }
    Ok(ScoredTable {
        table: out,
        counts: LabelCounts::from_labels(labels),
        failures,
    })
}

/// Supervised evaluation over the `Clean Review` / `sentiment` columns.
/// Missing review cells become empty documents.
pub fn evaluate(table: &ReviewTable, config: &AnalysisConfig) -> Result<EvaluationOutcome> {
    let reviews = column_or_empty(table, CLEAN_REVIEW)?;
    let labels = column_or_empty(table, SENTIMENT)?;
    EvaluationPipeline::new(config.clone())?.run(&reviews, &labels)
}

/// Blank input scores as neutral with zero polarity and subjectivity.
pub fn try_sentence<P>(text: &str, scorer: &P) -> std::result::Result<SentenceScore, ScoreError>
where
    P: PolarityScorer + ?Sized,
{
    let score = match scorer.score(text) {
        Err(ScoreError::MissingText) => PolarityScore::default(),
        other => other?,
    };
    Ok(SentenceScore {
        polarity: score.polarity,
        subjectivity: score.subjectivity,
        sentiment: polarity_label(score.polarity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierKind;
    use crate::error::Error;
    use crate::lexicon::{PatternLexicon, ValenceLexicon};

    fn table(csv: &str) -> ReviewTable {
        ReviewTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn label_counts_order() {
        let counts = LabelCounts::from_labels(["b", "a", "a", "c", "b", "d"]);
        let order: Vec<(&str, usize)> = counts.iter().collect();
        assert_eq!(order, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get("zzz"), 0);
        let text = counts.to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("sentiment"));
    }

    #[test]
    fn inspect_skips_missing_labels() {
        let t = table("Review,sentiment\nx,positive\ny,negative\nz,\nw,positive\n");
        let counts = inspect(&t).unwrap();
        assert_eq!(counts.get("positive"), 2);
        assert_eq!(counts.get("negative"), 1);
        assert_eq!(counts.total(), 3);

        let t = table("Review\nx\n");
        assert!(matches!(inspect(&t), Err(Error::MissingColumn(_))));
    }

    #[test]
    fn clean_keeps_empty_rows() {
        let t = table("Review,sentiment\nI LOVE this!!! 123,positive\n!!!,negative\n");
        let out = clean(&t, &Normalizer::english()).unwrap();
        assert_eq!(out.headers(), &[REVIEW, CLEAN_REVIEW]);
        assert_eq!(out.rows()[0], vec!["I LOVE this!!! 123", "love 123"]);
        assert_eq!(out.rows()[1][1], "");

        let out = clean_with_sentiment(&t, &Normalizer::english()).unwrap();
        assert_eq!(out.headers(), &[CLEAN_REVIEW, SENTIMENT]);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[1], vec!["", "negative"]);
    }

    #[test]
    fn polarity_failure_is_isolated_to_its_row() {
        let t = table("Clean Review,id\ngreat film,1\n,2\nawful film,3\nfilm,4\n");
        let scored = score_polarity(&t, &PatternLexicon::english()).unwrap();
        let rows = scored.table.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][3], "positive");
        assert_eq!(rows[1][1], "");
        assert_eq!(rows[1][4], ScoreError::MissingText.to_string());
        assert_eq!(rows[2][3], "negative");
        assert_eq!(rows[3][3], "neutral");
        assert_eq!(rows[3][4], "");
        assert_eq!(scored.failures, 1);
        assert_eq!(scored.counts.total(), 3);
    }

    #[test]
    fn valence_labels_and_counts() {
        let t = table("Review,sentiment\nGreat film!,positive\nawful,negative\nthe plot,neutral\n,x\n");
        let scored = score_valence(&t, &ValenceLexicon::english(), &ValenceThresholds::default()).unwrap();
        let labels: Vec<&str> = scored.table.rows().iter().map(|r| r[2].as_str()).collect();
        assert_eq!(labels, vec!["positive", "negative", "neutral", ""]);
        assert_eq!(scored.table.rows()[2][1], "0");
        assert_eq!(scored.failures, 1);
        assert_eq!(scored.counts.get("positive"), 1);
        assert_eq!(scored.counts.get("neutral"), 1);
    }

    #[test]
    fn try_sentence_labels_polarity() {
        let lexicon = PatternLexicon::english();
        let s = try_sentence("What a great movie", &lexicon).unwrap();
        assert_eq!(s.sentiment, Sentiment::Positive);
        assert_eq!(s.polarity, 0.8);
    }

    #[test]
    fn blank_sentence_is_neutral() {
        let lexicon = PatternLexicon::english();
        for text in ["", "   "] {
            let s = try_sentence(text, &lexicon).unwrap();
            assert_eq!(s.polarity, 0.0);
            assert_eq!(s.subjectivity, 0.0);
            assert_eq!(s.sentiment, Sentiment::Neutral);
        }
    }

    #[test]
    fn evaluate_reads_cleaned_columns() {
        let mut csv = String::from("Clean Review,sentiment\n");
        for i in 0..12 {
            if i % 2 == 0 {
                csv.push_str("great wonderful film,positive\n");
            } else {
                csv.push_str("awful boring film,negative\n");
            }
        }
        let mut config = AnalysisConfig::default();
        config.classifier.kind = ClassifierKind::LogisticRegression;
        config.split.train_rows = 8;
        let outcome = evaluate(&table(&csv), &config).unwrap();
        assert_eq!(outcome.predictions.len(), 4);
        assert_eq!(outcome.summary.accuracy, 1.0);

        let no_clean = table("Review,sentiment\na,positive\n");
        assert!(matches!(evaluate(&no_clean, &config), Err(Error::MissingColumn(_))));
    }
}
