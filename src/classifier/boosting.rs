use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vectorizer::matrix::FeatureMatrix;

use super::logistic::sigmoid;
use super::tree::{DecisionTree, Target, TreeParams};
use super::{argmax, check_columns, check_fit_input, Classifier};

/// Probabilities are clipped to `[EPS, 1 - EPS]` before taking logs
const EPS: f64 = 1e-15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
        }
    }
}

/// Gradient-boosted regression trees.
///
/// Two classes use the log-loss with one tree per stage; more classes use
/// the softmax loss with one tree per class per stage. Leaf values are
/// replaced by a single Newton step on the loss.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    params: BoostingParams,
    seed: u64,
    init: Vec<f64>,
    /// `stages[m][k]`: tree of stage `m` for raw score `k`
    stages: Vec<Vec<DecisionTree>>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn new(params: BoostingParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            init: Vec::new(),
            stages: Vec::new(),
            n_features: 0,
        }
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: Some(self.params.max_depth),
            min_samples_split: self.params.min_samples_split,
            max_features: None,
        }
    }

    /// Fit one regression tree on `residuals`, then set each leaf to
    /// `scale * sum(r) / sum(hessian)` over the rows it holds
    fn fit_stage_tree<H>(
        &self,
        x: &FeatureMatrix,
        residuals: &[f64],
        hessian: H,
        scale: f64,
        rng: &mut StdRng,
    ) -> DecisionTree
    where
        H: Fn(usize) -> f64,
    {
        let samples: Vec<usize> = (0..x.n_rows()).collect();
        let mut tree = DecisionTree::new(self.tree_params());
        tree.fit(x, Target::Value(residuals), &samples, rng);

        let leaves = tree.leaves();
        let mut numer = vec![0.0; tree.n_nodes()];
        let mut denom = vec![0.0; tree.n_nodes()];
        for (i, row) in x.rows().iter().enumerate() {
            let leaf = tree.leaf_index(row);
            numer[leaf] += residuals[i];
            denom[leaf] += hessian(i);
        }
        for leaf in leaves {
            let value = if denom[leaf].abs() < 1e-150 {
                0.0
            } else {
                scale * numer[leaf] / denom[leaf]
            };
            tree.set_leaf_value(leaf, vec![value]);
        }
        tree
    }

    /// Raw (pre-link) scores for every row
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        if self.init.is_empty() {
            return Err(Error::NotFitted);
        }
        check_columns(self.n_features, x)?;
        let lr = self.params.learning_rate;
        Ok(x.rows()
            .iter()
            .map(|row| {
                let mut raw = self.init.clone();
                for stage in &self.stages {
                    for (k, tree) in stage.iter().enumerate() {
                        raw[k] += lr * tree.predict_row(row).first().copied().unwrap_or(0.0);
                    }
                }
                raw
            })
            .collect())
    }

    fn fit_binary(&mut self, x: &FeatureMatrix, y: &[usize], rng: &mut StdRng) {
        let n = y.len() as f64;
        let prior = (y.iter().filter(|&&l| l == 1).count() as f64 / n).clamp(EPS, 1.0 - EPS);
        let init = (prior / (1.0 - prior)).ln();
        let mut raw = vec![init; y.len()];
        self.init = vec![init];

        for _ in 0..self.params.n_estimators {
            let proba: Vec<f64> = raw.iter().map(|&f| sigmoid(f)).collect();
            let residuals: Vec<f64> = y
                .iter()
                .zip(&proba)
                .map(|(&label, p)| label as f64 - p)
                .collect();
            let tree = self.fit_stage_tree(x, &residuals, |i| proba[i] * (1.0 - proba[i]), 1.0, rng);
            for (f, row) in raw.iter_mut().zip(x.rows()) {
                *f += self.params.learning_rate * tree.predict_row(row)[0];
            }
            self.stages.push(vec![tree]);
        }
    }

    fn fit_multiclass(&mut self, x: &FeatureMatrix, y: &[usize], n_classes: usize, rng: &mut StdRng) {
        let n = y.len() as f64;
        let k = n_classes as f64;
        let mut counts = vec![0.0; n_classes];
        for &label in y {
            counts[label] += 1.0;
        }
        let init: Vec<f64> = counts.iter().map(|c| (c / n).clamp(EPS, 1.0).ln()).collect();
        let mut raw: Vec<Vec<f64>> = vec![init.clone(); y.len()];
        self.init = init;

        for _ in 0..self.params.n_estimators {
            let proba: Vec<Vec<f64>> = raw.iter().map(|r| softmax(r)).collect();
            let mut stage = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                let residuals: Vec<f64> = y
                    .iter()
                    .zip(&proba)
                    .map(|(&label, p)| if label == class { 1.0 - p[class] } else { -p[class] })
                    .collect();
                let tree = self.fit_stage_tree(
                    x,
                    &residuals,
                    |i| {
                        let r = residuals[i].abs();
                        r * (1.0 - r)
                    },
                    (k - 1.0) / k,
                    rng,
                );
                stage.push(tree);
            }
            for (scores, row) in raw.iter_mut().zip(x.rows()) {
                for (score, tree) in scores.iter_mut().zip(&stage) {
                    *score += self.params.learning_rate * tree.predict_row(row)[0];
                }
            }
            self.stages.push(stage);
        }
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

impl Classifier for GradientBoosting {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize], n_classes: usize) -> Result<()> {
        check_fit_input(x, y, n_classes)?;
        self.stages.clear();
        self.n_features = x.n_cols();
        let mut rng = StdRng::seed_from_u64(self.seed);
        if n_classes == 2 {
            self.fit_binary(x, y, &mut rng);
        } else {
            self.fit_multiclass(x, y, n_classes, &mut rng);
        }
        debug!(
            stages = self.stages.len(),
            trees_per_stage = self.init.len(),
            "gradient boosting fitted"
        );
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        Ok(self
            .decision_function(x)?
            .iter()
            .map(|raw| {
                if raw.len() == 1 {
                    usize::from(raw[0] > 0.0)
                } else {
                    argmax(raw)
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "gradient-boosting"
    }
}
