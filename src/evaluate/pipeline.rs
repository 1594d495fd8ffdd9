use serde::Serialize;
use tracing::info;

use crate::classifier::{self, ClassifierKind, LabelEncoder};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::vectorizer::{FeatureExtractor, Vectorizer, VectorizerKind};

use super::metrics::{ClassificationReport, ConfusionMatrix, MetricSummary};
use super::report::ReportTable;
use super::split::Split;

/// Result of one supervised run
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub classifier: ClassifierKind,
    pub features: VectorizerKind,
    /// `(rows, columns)` of the training matrix
    pub train_shape: (usize, usize),
    /// `(rows, columns)` of the test matrix
    pub test_shape: (usize, usize),
    /// One predicted label per test row, in row order
    pub predictions: Vec<String>,
    pub summary: MetricSummary,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
}

impl EvaluationOutcome {
    pub fn report_table(&self) -> ReportTable {
        ReportTable::from_report(&self.report)
    }
}

/// Normalize, vectorize, fit and score one `(vectorizer, classifier)` choice.
///
/// The vectorizer is fitted on the training split only and the same fitted
/// instance transforms the test split.
#[derive(Debug, Clone)]
pub struct EvaluationPipeline {
    config: AnalysisConfig,
}

impl EvaluationPipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// # Arguments
    /// * `reviews` - review texts, in dataset order
    /// * `labels` - one non-empty label per review
    pub fn run<S, L>(&self, reviews: &[S], labels: &[L]) -> Result<EvaluationOutcome>
    where
        S: AsRef<str> + Sync,
        L: AsRef<str>,
    {
        if reviews.len() != labels.len() {
            return Err(Error::LengthMismatch {
                expected: reviews.len(),
                got: labels.len(),
            });
        }
        if let Some(row) = labels.iter().position(|l| l.as_ref().trim().is_empty()) {
            return Err(Error::MissingLabel { row });
        }

        let train_rows = self.config.split.train_rows;
        let docs = Split::positional(reviews, train_rows);
        let gold = Split::positional(labels, train_rows);
        if docs.train.is_empty() {
            return Err(Error::EmptyTrainingSplit);
        }
        if docs.test.is_empty() {
            return Err(Error::EmptyTestSplit);
        }
        info!(train = docs.train.len(), test = docs.test.len(), "split dataset");

        let normalizer = self.config.normalizer.build();
        let train_docs = normalizer.normalize_corpus(docs.train);
        let test_docs = normalizer.normalize_corpus(docs.test);

        let mut vectorizer = Vectorizer::from_config(&self.config.features)?;
        let x_train = vectorizer.fit_transform(&train_docs)?;
        let x_test = vectorizer.transform(&test_docs)?;
        info!(
            features = %vectorizer.kind(),
            train_shape = ?x_train.shape(),
            test_shape = ?x_test.shape(),
            "feature matrices built"
        );

        let encoder = LabelEncoder::fit(gold.train);
        if encoder.len() < 2 {
            return Err(Error::InsufficientClasses(encoder.len()));
        }
        let y_train = encoder.encode_all(gold.train);

        let kind = self.config.classifier.kind;
        let mut model = classifier::build(kind, &self.config.classifier.params, self.config.seed);
        info!(classifier = %kind, classes = encoder.len(), "fitting classifier");
        model.fit(&x_train, &y_train, encoder.len())?;

        let predictions = model
            .predict(&x_test)?
            .into_iter()
            .map(|idx| {
                encoder
                    .decode(idx)
                    .map(str::to_string)
                    .ok_or_else(|| Error::InvalidConfig(format!("predicted class {} out of range", idx)))
            })
            .collect::<Result<Vec<String>>>()?;

        let y_test: Vec<&str> = gold.test.iter().map(|l| l.as_ref()).collect();
        let y_pred: Vec<&str> = predictions.iter().map(String::as_str).collect();
        let classes = &self.config.classes;
        let report = ClassificationReport::compute(&y_test, &y_pred, classes)?;
        let confusion = ConfusionMatrix::compute(&y_test, &y_pred, classes)?;
        let summary = MetricSummary::from(&report);
        info!(
            accuracy = summary.accuracy,
            precision = summary.precision,
            recall = summary.recall,
            f1 = summary.f1,
            "evaluation finished"
        );

        Ok(EvaluationOutcome {
            classifier: kind,
            features: vectorizer.kind(),
            train_shape: x_train.shape(),
            test_shape: x_test.shape(),
            predictions,
            summary,
            confusion,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIVE: [&str; 3] = [
        "A wonderful, great film! Loved it",
        "Great acting, brilliant story",
        "Loved it, truly great",
    ];
    const NEGATIVE: [&str; 3] = [
        "Terrible and awful movie. Hated it",
        "Awful script, boring plot",
        "Hated it, dull and awful",
    ];

    /// Alternating positive / negative reviews
    fn dataset(n: usize) -> (Vec<String>, Vec<String>) {
        (0..n)
            .map(|i| {
                let template = (i / 2) % 3;
                if i % 2 == 0 {
                    (POSITIVE[template].to_string(), "positive".to_string())
                } else {
                    (NEGATIVE[template].to_string(), "negative".to_string())
                }
            })
            .unzip()
    }

    fn config(kind: ClassifierKind, train_rows: usize) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.classifier.kind = kind;
        config.split.train_rows = train_rows;
        config
    }

    #[test]
    fn perfect_predictions_give_unit_accuracy() {
        let (reviews, labels) = dataset(20);
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::GradientBoosting, 12)).unwrap();
        let outcome = pipeline.run(&reviews, &labels).unwrap();
        assert_eq!(outcome.predictions.len(), 8);
        assert_eq!(outcome.train_shape.0, 12);
        assert_eq!(outcome.test_shape.0, 8);
        assert_eq!(outcome.train_shape.1, outcome.test_shape.1);
        assert_eq!(outcome.predictions, labels[12..].to_vec());
        assert_eq!(outcome.summary.accuracy, 1.0);
        assert!(outcome.confusion.is_diagonal());
        assert_eq!(outcome.confusion.total(), 8);
        assert_eq!(outcome.report.weighted_avg.f1, 1.0);
    }

    #[test]
    fn every_classifier_and_feature_kind_runs() {
        let (reviews, labels) = dataset(30);
        for kind in ClassifierKind::ALL {
            for features in [VectorizerKind::Count, VectorizerKind::Tfidf] {
                let mut cfg = config(kind, 20);
                cfg.features.kind = features;
                let outcome = EvaluationPipeline::new(cfg).unwrap().run(&reviews, &labels).unwrap();
                assert_eq!(outcome.features, features);
                assert_eq!(outcome.summary.accuracy, 1.0, "{} / {}", kind, features);
            }
        }
    }

    #[test]
    fn missing_label_is_rejected() {
        let (reviews, mut labels) = dataset(10);
        labels[3] = "  ".to_string();
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::LinearSvm, 5)).unwrap();
        assert!(matches!(
            pipeline.run(&reviews, &labels),
            Err(Error::MissingLabel { row: 3 })
        ));
    }

    #[test]
    fn corpus_smaller_than_train_rows_has_no_test_split() {
        let (reviews, labels) = dataset(10);
        let pipeline = EvaluationPipeline::new(AnalysisConfig::default()).unwrap();
        assert!(matches!(pipeline.run(&reviews, &labels), Err(Error::EmptyTestSplit)));

        let empty: Vec<String> = Vec::new();
        assert!(matches!(pipeline.run(&empty, &empty), Err(Error::EmptyTrainingSplit)));
    }

    #[test]
    fn single_training_class_is_rejected() {
        let reviews = vec!["good", "fine", "great", "bad"];
        let labels = vec!["positive", "positive", "positive", "negative"];
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::LinearSvm, 3)).unwrap();
        assert!(matches!(
            pipeline.run(&reviews, &labels),
            Err(Error::InsufficientClasses(1))
        ));
    }

    #[test]
    fn undeclared_test_labels_count_against_accuracy_only() {
        let (reviews, mut labels) = dataset(16);
        labels[15] = "neutral".to_string();
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::LogisticRegression, 10)).unwrap();
        let outcome = pipeline.run(&reviews, &labels).unwrap();
        assert!((outcome.summary.accuracy - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(outcome.report.total_support, 5);
        assert_eq!(outcome.confusion.total(), 5);
        assert!(outcome.confusion.is_diagonal());
    }

    #[test]
    fn stop_word_only_training_text_is_rejected() {
        let reviews = ["I was the", "a b c", "it is on", "we and you", "great film", "awful film"];
        let labels = ["positive", "negative", "positive", "negative", "positive", "negative"];
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::LinearSvm, 4)).unwrap();
        assert!(matches!(pipeline.run(&reviews, &labels), Err(Error::EmptyVocabulary)));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let (reviews, labels) = dataset(10);
        let pipeline = EvaluationPipeline::new(config(ClassifierKind::LinearSvm, 5)).unwrap();
        assert!(matches!(
            pipeline.run(&reviews, &labels[..9]),
            Err(Error::LengthMismatch { expected: 10, got: 9 })
        ));
    }
}
