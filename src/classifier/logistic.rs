use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::vectorizer::matrix::FeatureMatrix;

use super::{check_fit_input, linear::LinearModel, Classifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Stop when the largest gradient component falls below this
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 500,
            tol: 1e-4,
        }
    }
}

/// L2-regularized logistic regression.
///
/// Minimizes `C * sum(log(1 + exp(-y * (w.x + b)))) + 0.5 * |w|^2` by
/// full-batch gradient descent with Armijo backtracking. The intercept is
/// not penalized.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LogisticParams,
    model: Option<LinearModel>,
}

/// `ln(1 + exp(-m))` without overflow
#[inline]
fn log_loss(margin: f64) -> f64 {
    if margin > 0.0 {
        (-margin).exp().ln_1p()
    } else {
        -margin + margin.exp().ln_1p()
    }
}

/// `1 / (1 + exp(-z))` without overflow
#[inline]
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(params: LogisticParams) -> Self {
        Self {
            params,
            model: None,
        }
    }

    fn objective(&self, x: &FeatureMatrix, targets: &[f64], w: &[f64], b: f64) -> f64 {
        let data: f64 = x
            .rows()
            .iter()
            .zip(targets)
            .map(|(row, y)| log_loss(y * (row.dot_dense(w) + b)))
            .sum();
        let penalty: f64 = w.iter().map(|v| v * v).sum();
        self.params.c * data + 0.5 * penalty
    }

    /// Gradient with respect to `(w, b)`
    fn gradient(&self, x: &FeatureMatrix, targets: &[f64], w: &[f64], b: f64) -> (Vec<f64>, f64) {
        let c = self.params.c;
        let mut grad_w = w.to_vec();
        let mut grad_b = 0.0;
        for (row, y) in x.rows().iter().zip(targets) {
            let margin = y * (row.dot_dense(w) + b);
            let coef = c * (sigmoid(margin) - 1.0) * y;
            if coef != 0.0 {
                row.axpy_into(coef, &mut grad_w);
                grad_b += coef;
            }
        }
        (grad_w, grad_b)
    }

    fn fit_binary(&self, x: &FeatureMatrix, targets: &[f64]) -> (Vec<f64>, f64) {
        let p = &self.params;
        let mut w = vec![0.0; x.n_cols()];
        let mut b = 0.0;
        let mut loss = self.objective(x, targets, &w, b);
        let mut step = 1.0;

        for iter in 0..p.max_iter {
            let (grad_w, grad_b) = self.gradient(x, targets, &w, b);
            let grad_max = grad_w
                .iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if grad_max <= p.tol {
                debug!(iter, loss, "logistic regression converged");
                return (w, b);
            }
            let grad_sq: f64 = grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b;

            // Armijo backtracking, starting from twice the last accepted step
            step *= 2.0;
            loop {
                let cand_w: Vec<f64> = w.iter().zip(&grad_w).map(|(v, g)| v - step * g).collect();
                let cand_b = b - step * grad_b;
                let cand_loss = self.objective(x, targets, &cand_w, cand_b);
                if cand_loss <= loss - 1e-4 * step * grad_sq {
                    w = cand_w;
                    b = cand_b;
                    loss = cand_loss;
                    break;
                }
                step *= 0.5;
                if step < 1e-16 {
                    debug!(iter, loss, "logistic regression line search stalled");
                    return (w, b);
                }
            }
        }
        warn!(max_iter = p.max_iter, loss, "logistic regression reached max_iter without converging");
        (w, b)
    }
}

impl Classifier for LogisticRegression {
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
        "logistic-regression"
    }
}
