use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;

use super::metrics::{Averages, ClassificationReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: f64,
}

/// Tabular rendering of a [`ClassificationReport`].
///
/// Rows: one per declared class, then `accuracy`, `macro avg`, `weighted avg`.
/// The `accuracy` row has zero precision and recall, the accuracy itself in
/// the f1-score cell and the total support in the support cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub const HEADER: [&'static str; 5] = ["", "precision", "recall", "f1-score", "support"];

    pub fn from_report(report: &ClassificationReport) -> Self {
        let support = report.total_support as f64;
        let avg_row = |name: &str, avg: &Averages| ReportRow {
            name: name.to_string(),
            precision: avg.precision,
            recall: avg.recall,
            f1_score: avg.f1,
            support,
        };

        let mut rows: Vec<ReportRow> = report
            .classes
            .iter()
            .map(|c| ReportRow {
                name: c.label.clone(),
                precision: c.precision,
                recall: c.recall,
                f1_score: c.f1,
                support: c.support as f64,
            })
            .collect();
        rows.push(ReportRow {
            name: "accuracy".to_string(),
            precision: 0.0,
            recall: 0.0,
            f1_score: report.accuracy,
            support,
        });
        rows.push(avg_row("macro avg", &report.macro_avg));
        rows.push(avg_row("weighted avg", &report.weighted_avg));
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn row(&self, name: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// UTF-8 CSV with header `,precision,recall,f1-score,support`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(Self::HEADER)?;
        for row in &self.rows {
            wtr.write_record([
                row.name.clone(),
                row.precision.to_string(),
                row.recall.to_string(),
                row.f1_score.to_string(),
                row.support.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0);
        write!(f, "{:name_w$}", "")?;
        for head in &Self::HEADER[1..] {
            write!(f, " {:>10}", head)?;
        }
        for row in &self.rows {
            writeln!(f)?;
            write!(
                f,
                "{:>name_w$} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                row.name, row.precision, row.recall, row.f1_score, row.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ClassificationReport {
        let t = ["positive", "positive", "negative", "negative"];
        let p = ["positive", "negative", "negative", "negative"];
        ClassificationReport::compute(&t, &p, &["positive", "negative"]).unwrap()
    }

    #[test]
    fn row_order_and_accuracy_row() {
        let table = ReportTable::from_report(&report());
        let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["positive", "negative", "accuracy", "macro avg", "weighted avg"]
        );
        let acc = table.row("accuracy").unwrap();
        assert_eq!(acc.precision, 0.0);
        assert_eq!(acc.recall, 0.0);
        assert_eq!(acc.f1_score, 0.75);
        assert_eq!(acc.support, 4.0);
        assert_eq!(table.row("positive").unwrap().support, 2.0);
    }

    #[test]
    fn csv_layout() {
        let table = ReportTable::from_report(&report());
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(",precision,recall,f1-score,support"));
        assert_eq!(lines.next(), Some("positive,1,0.5,0.6666666666666666,2"));
        assert_eq!(text.lines().nth(3), Some("accuracy,0,0,0.75,4"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn text_table_lists_every_row() {
        let table = ReportTable::from_report(&report());
        let text = table.to_string();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().next().unwrap().contains("f1-score"));
        assert!(text.contains("weighted avg"));
    }
}
