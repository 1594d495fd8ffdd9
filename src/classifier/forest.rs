use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vectorizer::matrix::FeatureMatrix;

use super::tree::{DecisionTree, Target, TreeParams};
use super::{argmax, check_columns, check_fit_input, Classifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// `None` grows every tree until its leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Bagged Gini trees.
///
/// Tree `i` draws its bootstrap sample and its split features from a RNG
/// seeded with `seed + i`, so a forest is reproducible regardless of how the
/// trees are scheduled across threads.
#[derive(Debug, Clone)]
pub struct RandomForest {
    params: ForestParams,
    seed: u64,
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    pub fn new(params: ForestParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            trees: Vec::new(),
            n_classes: 0,
        }
    }

    /// Mean class probabilities of every tree, one vector per row
    pub fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        let first = self.trees.first().ok_or(Error::NotFitted)?;
        check_columns(first.n_features(), x)?;
        let n_trees = self.trees.len() as f64;
        Ok(x.rows()
            .par_iter()
            .map(|row| {
                let mut proba = vec![0.0; self.n_classes];
                for tree in &self.trees {
                    for (p, v) in proba.iter_mut().zip(tree.predict_row(row)) {
                        *p += v;
                    }
                }
                proba.iter_mut().for_each(|p| *p /= n_trees);
                proba
            })
            .collect())
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &FeatureMatrix, y: &[usize], n_classes: usize) -> Result<()> {
        check_fit_input(x, y, n_classes)?;
        let n_rows = x.n_rows();
        let max_features = (x.n_cols() as f64).sqrt().ceil().max(1.0) as usize;
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            max_features: Some(max_features),
        };

        self.trees = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
                let samples: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
                let mut tree = DecisionTree::new(tree_params);
                tree.fit(
                    x,
                    Target::Class {
                        labels: y,
                        n_classes,
                    },
                    &samples,
                    &mut rng,
                );
                tree
            })
            .collect();
        self.n_classes = n_classes;
        debug!(
            trees = self.trees.len(),
            max_features,
            nodes = self.trees.iter().map(|t| t.n_nodes()).sum::<usize>(),
            "random forest fitted"
        );
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<usize>> {
        Ok(self.predict_proba(x)?.iter().map(|p| argmax(p)).collect())
    }

    fn name(&self) -> &'static str {
        "random-forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::fixtures;

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y) = fixtures::three_classes();
        let mut rf = RandomForest::new(ForestParams::default(), 42);
        rf.fit(&x, &y, 3).unwrap();
        assert_eq!(rf.trees.len(), 10);
        for p in rf.predict_proba(&x).unwrap() {
            assert_eq!(p.len(), 3);
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn reproducible_for_a_seed() {
        let (x, y) = fixtures::separable();
        let mut a = RandomForest::new(ForestParams::default(), 5);
        let mut b = RandomForest::new(ForestParams::default(), 5);
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();
        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }
}
