use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn check_aligned<S: AsRef<str>>(y_true: &[S], y_pred: &[S]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::LengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    Ok(())
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Fraction of rows where the prediction equals the truth, over every row
pub fn accuracy<S: AsRef<str>>(y_true: &[S], y_pred: &[S]) -> Result<f64> {
    check_aligned(y_true, y_pred)?;
    let hits = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t.as_ref() == p.as_ref())
        .count();
    Ok(ratio(hits, y_true.len()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows whose true label is this class
    pub support: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class precision / recall / F1 over a declared class list.
///
/// A zero denominator yields 0. Labels outside the declared list still count
/// toward `accuracy` but get no row of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: Averages,
    pub weighted_avg: Averages,
    /// Support summed over the declared classes
    pub total_support: usize,
}

impl ClassificationReport {
    pub fn compute<S, L>(y_true: &[S], y_pred: &[S], labels: &[L]) -> Result<Self>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        let accuracy = accuracy(y_true, y_pred)?;
        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                let mut tp = 0;
                let mut predicted = 0;
                let mut actual = 0;
                for (t, p) in y_true.iter().zip(y_pred) {
                    let is_true = t.as_ref() == label;
                    let is_pred = p.as_ref() == label;
                    actual += usize::from(is_true);
                    predicted += usize::from(is_pred);
                    tp += usize::from(is_true && is_pred);
                }
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, actual);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1,
                    support: actual,
                }
            })
            .collect();

        let total_support: usize = classes.iter().map(|c| c.support).sum();
        let n = classes.len().max(1) as f64;
        let macro_avg = Averages {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
        };
        let weighted_avg = if total_support == 0 {
            Averages::default()
        } else {
            let w = |f: fn(&ClassMetrics) -> f64| {
                classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total_support as f64
            };
            Averages {
                precision: w(|c| c.precision),
                recall: w(|c| c.recall),
                f1: w(|c| c.f1),
            }
        };

        Ok(Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
            total_support,
        })
    }

    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

/// Headline numbers: accuracy plus support-weighted precision / recall / F1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl From<&ClassificationReport> for MetricSummary {
    fn from(report: &ClassificationReport) -> Self {
        Self {
            accuracy: report.accuracy,
            precision: report.weighted_avg.precision,
            recall: report.weighted_avg.recall,
            f1: report.weighted_avg.f1,
        }
    }
}

impl fmt::Display for MetricSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall: {:.4}", self.recall)?;
        write!(f, "F1 Score: {:.4}", self.f1)
    }
}

/// Confusion counts restricted to the declared labels, in declared order.
/// `counts[actual][predicted]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn compute<S, L>(y_true: &[S], y_pred: &[S], labels: &[L]) -> Result<Self>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        check_aligned(y_true, y_pred)?;
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let position = |label: &str| labels.iter().position(|l| l == label);
        let mut counts = vec![vec![0; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            if let (Some(i), Some(j)) = (position(t.as_ref()), position(p.as_ref())) {
                counts[i][j] += 1;
            }
        }
        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count of rows with true label index `actual` predicted as `predicted`
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// No off-diagonal counts
    pub fn is_diagonal(&self) -> bool {
        self.counts
            .iter()
            .enumerate()
            .all(|(i, row)| row.iter().enumerate().all(|(j, &c)| i == j || c == 0))
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_w = self.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let count_w = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1)
            .max(label_w);
        let margin = "Actual:".len() + 1 + label_w;

        writeln!(f, "{:margin$} Predicted:", "")?;
        write!(f, "{:margin$}", "")?;
        for label in &self.labels {
            write!(f, " {:>count_w$}", label)?;
        }
        for (i, (label, row)) in self.labels.iter().zip(&self.counts).enumerate() {
            writeln!(f)?;
            let head = if i == 0 { "Actual:" } else { "" };
            write!(f, "{:7} {:label_w$}", head, label)?;
            for c in row {
                write!(f, " {:>count_w$}", c)?;
            }
        }
        Ok(())
    }
}
