use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vectorizer::matrix::FeatureMatrix;

use super::{argmax, check_columns};

/// Fitted linear decision functions, one-vs-rest.
///
/// Two classes share a single function (positive score means class 1);
/// more classes get one function each and the highest score wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModel {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl LinearModel {
    /// Fit every binary sub-problem.
    ///
    /// # Arguments
    /// * `fit_binary` - trains on `±1` targets and returns `(weights, intercept)`
    pub fn fit_ovr<F>(x: &FeatureMatrix, y: &[usize], n_classes: usize, fit_binary: F) -> Self
    where
        F: Fn(&[f64]) -> (Vec<f64>, f64) + Sync,
    {
        let positives: Vec<usize> = if n_classes == 2 {
            vec![1]
        } else {
            (0..n_classes).collect()
        };
        let (coef, intercept): (Vec<Vec<f64>>, Vec<f64>) = positives
            .par_iter()
            .map(|&positive| {
                let targets: Vec<f64> = y
                    .iter()
                    .map(|&label| if label == positive { 1.0 } else { -1.0 })
                    .collect();
                fit_binary(&targets)
            })
            .unzip();
        Self {
            coef,
            intercept,
            n_features: x.n_cols(),
        }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Raw scores of every decision function for each row
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        check_columns(self.n_features, x)?;
        Ok(x.rows()
            .iter()
            .map(|row| {
                self.coef
                    .iter()
                    .zip(&self.intercept)
                    .map(|(w, b)| row.dot_dense(w) + b)
                    .collect()
            })
            .collect())
    }

    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        let scores = self.decision_function(x)?;
        Ok(scores
            .iter()
            .map(|s| {
                if s.len() == 1 {
                    usize::from(s[0] > 0.0)
                } else {
                    argmax(s)
                }
            })
            .collect())
    }
}
