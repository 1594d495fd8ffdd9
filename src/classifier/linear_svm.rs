use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::vectorizer::matrix::FeatureMatrix;

use super::{check_fit_input, linear::LinearModel, Classifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSvmParams {
    /// L2 penalty strength
    pub alpha: f64,
    /// Maximum passes over the training rows
    pub max_iter: usize,
    /// Stop when the epoch loss improves by less than `tol * n_rows`
    pub tol: f64,
    /// Epochs without improvement before stopping
    pub n_iter_no_change: usize,
}

impl Default for LinearSvmParams {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            max_iter: 100,
            tol: 1e-3,
            n_iter_no_change: 5,
        }
    }
}

/// Linear margin classifier: hinge loss with an L2 penalty, trained by
/// stochastic gradient descent.
///
/// The learning rate follows `1 / (alpha * (t0 + t))`, where `t0` is chosen
/// from `alpha` so the first steps are neither tiny nor explosive. Rows are
/// reshuffled before every epoch with a seeded RNG.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    params: LinearSvmParams,
    seed: u64,
    model: Option<LinearModel>,
}

impl LinearSvm {
    pub fn new(params: LinearSvmParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            model: None,
        }
    }

    fn fit_binary(&self, x: &FeatureMatrix, targets: &[f64]) -> (Vec<f64>, f64) {
        let p = &self.params;
        let n_rows = x.n_rows();
        let mut w = vec![0.0; x.n_cols()];
        let mut wscale = 1.0;
        let mut intercept = 0.0;

        let typw = (1.0 / p.alpha.sqrt()).sqrt();
        let t0 = 1.0 / (typw * p.alpha);
        let mut t = 1.0;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n_rows).collect();
        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;
        let mut converged = false;

        for epoch in 0..p.max_iter {
            order.shuffle(&mut rng);
            let mut sum_loss = 0.0;
            for &i in &order {
                let row = x.row(i);
                let y = targets[i];
                let score = row.dot_dense(&w) * wscale + intercept;
                let margin = y * score;
                sum_loss += (1.0 - margin).max(0.0);

                let eta = 1.0 / (p.alpha * (t0 + t - 1.0));
                let update = if margin <= 1.0 { eta * y } else { 0.0 };

                // alpha >= 1 can drive the factor to zero; fold it in before dividing
                wscale *= (1.0 - eta * p.alpha).max(0.0);
                if wscale < 1e-9 {
                    w.iter_mut().for_each(|v| *v *= wscale);
                    wscale = 1.0;
                }
                if update != 0.0 {
                    row.axpy_into(update / wscale, &mut w);
                    intercept += update;
                }
                t += 1.0;
            }

            if sum_loss > best_loss - p.tol * n_rows as f64 {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(sum_loss);
            if no_improvement >= p.n_iter_no_change {
                debug!(epoch = epoch + 1, loss = sum_loss, "linear svm converged");
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(max_iter = p.max_iter, "linear svm reached max_iter without converging");
        }

        w.iter_mut().for_each(|v| *v *= wscale);
        (w, intercept)
    }
}

impl Classifier for LinearSvm {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize], n_classes: usize) -> Result<()> {
        check_fit_input(x, y, n_classes)?;
        let model = LinearModel::fit_ovr(x, y, n_classes, |targets| self.fit_binary(x, targets));
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        self.model.as_ref().ok_or(Error::NotFitted)?.predict(x)
    }

    fn name(&self) -> &'static str {
        "linear-svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::fixtures;

    #[test]
    fn same_seed_same_model() {
        let (x, y) = fixtures::separable();
        let mut a = LinearSvm::new(LinearSvmParams::default(), 3);
        let mut b = LinearSvm::new(LinearSvmParams::default(), 3);
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();
        let da = a.model.as_ref().unwrap().decision_function(&x).unwrap();
        let db = b.model.as_ref().unwrap().decision_function(&x).unwrap();
        assert_eq!(da, db);
    }

    #[test]
    fn separates_with_margin_sign() {
        let (x, y) = fixtures::separable();
        let mut svm = LinearSvm::new(LinearSvmParams::default(), 42);
        svm.fit(&x, &y, 2).unwrap();
        let scores = svm.model.as_ref().unwrap().decision_function(&x).unwrap();
        for (s, label) in scores.iter().zip(&y) {
            assert_eq!(s.len(), 1);
            assert_eq!(s[0] > 0.0, *label == 1);
        }
    }

    #[test]
    fn large_alpha_keeps_finite_weights() {
        let (x, y) = fixtures::separable();
        let params = LinearSvmParams {
            alpha: 1.0,
            ..Default::default()
        };
        let mut svm = LinearSvm::new(params, 42);
        svm.fit(&x, &y, 2).unwrap();
        let scores = svm.model.as_ref().unwrap().decision_function(&x).unwrap();
        assert!(scores.iter().flatten().all(|s| s.is_finite()));
        assert_eq!(svm.predict(&x).unwrap().len(), y.len());
    }
}
