//! Supervised classifiers over sparse feature matrices
//!
//! Every model implements [`Classifier`]. Labels are class indices produced
//! by [`LabelEncoder`]; the evaluation harness maps them back to strings.

pub mod boosting;
pub mod forest;
pub mod labels;
pub mod linear;
pub mod linear_svm;
pub mod logistic;
pub mod tree;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::matrix::FeatureMatrix;

pub use boosting::{BoostingParams, GradientBoosting};
pub use forest::{ForestParams, RandomForest};
pub use labels::LabelEncoder;
pub use linear_svm::{LinearSvm, LinearSvmParams};
pub use logistic::{LogisticParams, LogisticRegression};

/// Fit / predict contract shared by every model
pub trait Classifier: Send + Sync {
    /// Train on `x` with labels `y` in `0..n_classes`
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize], n_classes: usize) -> Result<()>;

    /// One class index per row of `x`, in row order
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>>;

    fn name(&self) -> &'static str;
}

/// The closed set of supported models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierKind {
    #[default]
    LinearSvm,
    LogisticRegression,
    GradientBoosting,
    RandomForest,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 4] = [
        ClassifierKind::LinearSvm,
        ClassifierKind::LogisticRegression,
        ClassifierKind::GradientBoosting,
        ClassifierKind::RandomForest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::LinearSvm => "linear-svm",
            ClassifierKind::LogisticRegression => "logistic-regression",
            ClassifierKind::GradientBoosting => "gradient-boosting",
            ClassifierKind::RandomForest => "random-forest",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown classifier: {}", s)))
    }
}

/// Hyperparameters of every kind; only the section of the chosen kind is used
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub linear_svm: LinearSvmParams,
    pub logistic_regression: LogisticParams,
    pub random_forest: ForestParams,
    pub gradient_boosting: BoostingParams,
}

impl ClassifierParams {
    pub fn validate(&self) -> Result<()> {
        let svm = &self.linear_svm;
        positive("linear_svm.alpha", svm.alpha)?;
        positive("linear_svm.tol", svm.tol)?;
        nonzero("linear_svm.max_iter", svm.max_iter)?;
        nonzero("linear_svm.n_iter_no_change", svm.n_iter_no_change)?;

        let lr = &self.logistic_regression;
        positive("logistic_regression.c", lr.c)?;
        positive("logistic_regression.tol", lr.tol)?;
        nonzero("logistic_regression.max_iter", lr.max_iter)?;

        let rf = &self.random_forest;
        nonzero("random_forest.n_estimators", rf.n_estimators)?;
        if rf.min_samples_split < 2 {
            return Err(Error::InvalidConfig(
                "random_forest.min_samples_split must be at least 2".to_string(),
            ));
        }
        if rf.max_depth == Some(0) {
            return Err(Error::InvalidConfig("random_forest.max_depth must be positive".to_string()));
        }

        let gb = &self.gradient_boosting;
        nonzero("gradient_boosting.n_estimators", gb.n_estimators)?;
        nonzero("gradient_boosting.max_depth", gb.max_depth)?;
        positive("gradient_boosting.learning_rate", gb.learning_rate)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, value)))
    }
}

fn nonzero(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be positive", name)))
    }
}

/// Construct an unfitted model of the given kind
pub fn build(kind: ClassifierKind, params: &ClassifierParams, seed: u64) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::LinearSvm => Box::new(LinearSvm::new(params.linear_svm.clone(), seed)),
        ClassifierKind::LogisticRegression => {
            Box::new(LogisticRegression::new(params.logistic_regression.clone()))
        }
        ClassifierKind::GradientBoosting => {
            Box::new(GradientBoosting::new(params.gradient_boosting.clone(), seed))
        }
        ClassifierKind::RandomForest => {
            Box::new(RandomForest::new(params.random_forest.clone(), seed))
        }
    }
}

/// Shape checks shared by every `fit`
pub(crate) fn check_fit_input(x: &FeatureMatrix, y: &[usize], n_classes: usize) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(Error::LengthMismatch {
            expected: x.n_rows(),
            got: y.len(),
        });
    }
    if x.n_rows() == 0 {
        return Err(Error::EmptyTrainingSplit);
    }
    if n_classes < 2 {
        return Err(Error::InsufficientClasses(n_classes));
    }
    if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
        return Err(Error::InvalidConfig(format!(
            "label index {} out of range for {} classes",
            bad, n_classes
        )));
    }
    Ok(())
}

pub(crate) fn check_columns(expected: usize, x: &FeatureMatrix) -> Result<()> {
    if x.n_cols() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            got: x.n_cols(),
        });
    }
    Ok(())
}

/// Index of the largest value; the first one wins ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str_and_serde() {
        for kind in ClassifierKind::ALL {
            assert_eq!(kind.as_str().parse::<ClassifierKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(
            "random_forest".parse::<ClassifierKind>().unwrap(),
            ClassifierKind::RandomForest
        );
        assert!("naive-bayes".parse::<ClassifierKind>().is_err());
    }

    #[test]
    fn every_kind_learns_separable_data() {
        let (x, y) = fixtures::separable();
        for kind in ClassifierKind::ALL {
            let mut model = build(kind, &ClassifierParams::default(), 42);
            assert!(matches!(model.predict(&x), Err(Error::NotFitted)), "{}", kind);
            model.fit(&x, &y, 2).unwrap();
            let pred = model.predict(&x).unwrap();
            assert_eq!(pred, y, "{}", model.name());
        }
    }

    #[test]
    fn every_kind_handles_three_classes() {
        let (x, y) = fixtures::three_classes();
        for kind in ClassifierKind::ALL {
            let mut model = build(kind, &ClassifierParams::default(), 7);
            model.fit(&x, &y, 3).unwrap();
            let pred = model.predict(&x).unwrap();
            assert_eq!(pred, y, "{}", model.name());
        }
    }

    #[test]
    fn fit_input_checks() {
        let (x, y) = fixtures::separable();
        let mut model = build(ClassifierKind::LogisticRegression, &ClassifierParams::default(), 0);
        assert!(matches!(
            model.fit(&x, &y[..5], 2),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(
            model.fit(&x, &vec![0; y.len()], 1),
            Err(Error::InsufficientClasses(1))
        ));
        model.fit(&x, &y, 2).unwrap();
        let narrow = FeatureMatrix::new(vec![], 2);
        assert!(matches!(
            model.predict(&narrow),
            Err(Error::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn default_params_validate() {
        assert!(ClassifierParams::default().validate().is_ok());
        let mut params = ClassifierParams::default();
        params.linear_svm.alpha = -1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
