//! Train/test evaluation: positional split, metrics and report rendering

pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod split;

pub use metrics::{accuracy, Averages, ClassMetrics, ClassificationReport, ConfusionMatrix, MetricSummary};
pub use pipeline::{EvaluationOutcome, EvaluationPipeline};
pub use report::{ReportRow, ReportTable};
pub use split::Split;
