//! CART decision tree over sparse rows
//!
//! Used as the base learner of [`super::RandomForest`] (Gini, class
//! probabilities in the leaves) and [`super::GradientBoosting`] (MSE,
//! regression values in the leaves). Nodes live in a flat arena; children are
//! referenced by index.

use std::collections::HashMap;

use ahash::RandomState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::matrix::FeatureMatrix;

/// Impurity improvements below this are treated as no improvement
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class probabilities, or a single regression value
    Leaf { value: Vec<f64> },
}

/// What the tree is fitted against
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Class { labels: &'a [usize], n_classes: usize },
    Value(&'a [f64]),
}

/// Sufficient statistics of a set of rows
#[derive(Debug, Clone, PartialEq)]
enum Stats {
    Class { counts: Vec<f64>, n: f64 },
    Value { n: f64, sum: f64, sum_sq: f64 },
}

impl Stats {
    fn empty(target: &Target<'_>) -> Self {
        match target {
            Target::Class { n_classes, .. } => Stats::Class {
                counts: vec![0.0; *n_classes],
                n: 0.0,
            },
            Target::Value(_) => Stats::Value {
                n: 0.0,
                sum: 0.0,
                sum_sq: 0.0,
            },
        }
    }

    fn add_sample(&mut self, target: &Target<'_>, sample: usize) {
        match (self, target) {
            (Stats::Class { counts, n }, Target::Class { labels, .. }) => {
                counts[labels[sample]] += 1.0;
                *n += 1.0;
            }
            (Stats::Value { n, sum, sum_sq }, Target::Value(values)) => {
                let v = values[sample];
                *n += 1.0;
                *sum += v;
                *sum_sq += v * v;
            }
            _ => unreachable!("stats and target kinds always match"),
        }
    }

    fn add(&mut self, other: &Stats) {
        match (self, other) {
            (Stats::Class { counts, n }, Stats::Class { counts: oc, n: on }) => {
                counts.iter_mut().zip(oc).for_each(|(c, o)| *c += o);
                *n += on;
            }
            (
                Stats::Value { n, sum, sum_sq },
                Stats::Value {
                    n: on,
                    sum: os,
                    sum_sq: oss,
                },
            ) => {
                *n += on;
                *sum += os;
                *sum_sq += oss;
            }
            _ => unreachable!("stats kinds always match"),
        }
    }

    fn minus(&self, other: &Stats) -> Stats {
        match (self, other) {
            (Stats::Class { counts, n }, Stats::Class { counts: oc, n: on }) => Stats::Class {
                counts: counts.iter().zip(oc).map(|(c, o)| c - o).collect(),
                n: n - on,
            },
            (
                Stats::Value { n, sum, sum_sq },
                Stats::Value {
                    n: on,
                    sum: os,
                    sum_sq: oss,
                },
            ) => Stats::Value {
                n: n - on,
                sum: sum - os,
                sum_sq: sum_sq - oss,
            },
            _ => unreachable!("stats kinds always match"),
        }
    }

    #[inline]
    fn n(&self) -> f64 {
        match self {
            Stats::Class { n, .. } | Stats::Value { n, .. } => *n,
        }
    }

    /// Gini for classes, variance for values
    fn impurity(&self) -> f64 {
        let n = self.n();
        if n <= 0.0 {
            return 0.0;
        }
        match self {
            Stats::Class { counts, .. } => 1.0 - counts.iter().map(|c| (c / n) * (c / n)).sum::<f64>(),
            Stats::Value { sum, sum_sq, .. } => {
                let mean = sum / n;
                (sum_sq / n - mean * mean).max(0.0)
            }
        }
    }

    fn leaf_value(&self) -> Vec<f64> {
        let n = self.n();
        match self {
            Stats::Class { counts, .. } => {
                if n > 0.0 {
                    counts.iter().map(|c| c / n).collect()
                } else {
                    counts.clone()
                }
            }
            Stats::Value { sum, .. } => vec![if n > 0.0 { sum / n } else { 0.0 }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined per split; `None` examines every active feature
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// Grow the tree.
    ///
    /// # Arguments
    /// * `x` - feature matrix
    /// * `target` - labels or regression values, indexed by row
    /// * `samples` - rows to train on; duplicates act as weights (bootstrap)
    /// * `rng` - drives feature subsampling
    pub fn fit(&mut self, x: &FeatureMatrix, target: Target<'_>, samples: &[usize], rng: &mut StdRng) {
        self.n_features = x.n_cols();
        self.nodes.clear();
        self.nodes.push(Node::Leaf { value: Vec::new() });

        let mut stack = vec![(0usize, samples.to_vec(), 0usize)];
        while let Some((slot, node_samples, depth)) = stack.pop() {
            let mut stats = Stats::empty(&target);
            for &s in &node_samples {
                stats.add_sample(&target, s);
            }

            let can_split = self.params.max_depth.map_or(true, |d| depth < d)
                && node_samples.len() >= self.params.min_samples_split
                && stats.impurity() > MIN_IMPURITY_DECREASE;
            let best = if can_split {
                self.best_split(x, &target, &node_samples, &stats, rng)
            } else {
                None
            };

            match best {
                Some(split) => {
                    let (left, right): (Vec<usize>, Vec<usize>) = node_samples
                        .iter()
                        .copied()
                        .partition(|&s| x.row(s).get(split.feature) <= split.threshold);
                    let left_slot = self.nodes.len();
                    self.nodes.push(Node::Leaf { value: Vec::new() });
                    self.nodes.push(Node::Leaf { value: Vec::new() });
                    self.nodes[slot] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left: left_slot,
                        right: left_slot + 1,
                    };
                    stack.push((left_slot + 1, right, depth + 1));
                    stack.push((left_slot, left, depth + 1));
                }
                None => {
                    self.nodes[slot] = Node::Leaf {
                        value: stats.leaf_value(),
                    };
                }
            }
        }
    }

    fn best_split(
        &self,
        x: &FeatureMatrix,
        target: &Target<'_>,
        samples: &[usize],
        total: &Stats,
        rng: &mut StdRng,
    ) -> Option<BestSplit> {
        // feature -> nonzero (value, sample) pairs of this node; with
        // subsampling only the features actually scanned are collected
        let (mut columns, features) = match self.params.max_features {
            None => {
                let columns = Self::node_columns(x, samples);
                let mut features: Vec<usize> = columns.keys().copied().collect();
                features.sort_unstable();
                (columns, features)
            }
            Some(_) => {
                let mut features: Vec<usize> = samples
                    .iter()
                    .flat_map(|&s| x.row(s).indices().iter().map(|&f| f as usize))
                    .collect();
                features.sort_unstable();
                features.dedup();
                features.shuffle(rng);
                (HashMap::with_hasher(RandomState::new()), features)
            }
        };

        let n = total.n();
        let parent = total.impurity();
        let mut best: Option<BestSplit> = None;
        let mut visited = 0;
        for feature in features {
            if let Some(limit) = self.params.max_features {
                if visited >= limit && best.is_some() {
                    break;
                }
            }
            let entries = columns
                .entry(feature)
                .or_insert_with(|| Self::column_entries(x, samples, feature));
            let Some(candidate) = Self::scan_feature(target, entries, samples.len(), total, n) else {
                continue;
            };
            visited += 1;
            if parent - candidate.0 > MIN_IMPURITY_DECREASE
                && best.as_ref().map_or(true, |b| candidate.0 < b.impurity)
            {
                best = Some(BestSplit {
                    feature,
                    threshold: candidate.1,
                    impurity: candidate.0,
                });
            }
        }
        best
    }

    /// Nonzero `(value, sample)` pairs of every feature active in the node
    fn node_columns(x: &FeatureMatrix, samples: &[usize]) -> HashMap<usize, Vec<(f64, usize)>, RandomState> {
        let mut columns: HashMap<usize, Vec<(f64, usize)>, RandomState> =
            HashMap::with_hasher(RandomState::new());
        for &s in samples {
            for (f, v) in x.row(s).raw_iter() {
                columns.entry(f).or_default().push((*v, s));
            }
        }
        columns
    }

    /// Nonzero `(value, sample)` pairs of one feature, duplicates kept
    fn column_entries(x: &FeatureMatrix, samples: &[usize], feature: usize) -> Vec<(f64, usize)> {
        samples
            .iter()
            .filter_map(|&s| {
                let v = x.row(s).get(feature);
                (v != 0.0).then_some((v, s))
            })
            .collect()
    }

    /// Best `(weighted child impurity, threshold)` for one feature, `None` if
    /// the feature is constant in the node
    fn scan_feature(
        target: &Target<'_>,
        entries: &mut [(f64, usize)],
        n_samples: usize,
        total: &Stats,
        n: f64,
    ) -> Option<(f64, f64)> {
        entries.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut nonzero = Stats::empty(target);
        for &(_, s) in entries.iter() {
            nonzero.add_sample(target, s);
        }
        let zeros = total.minus(&nonzero);
        let has_zeros = entries.len() < n_samples;

        let mut left = Stats::empty(target);
        let mut prev: Option<f64> = None;
        let mut best: Option<(f64, f64)> = None;
        let mut zero_pending = has_zeros;

        let consider = |left: &Stats, prev: f64, next: f64, best: &mut Option<(f64, f64)>| {
            let right = total.minus(left);
            let score = (left.n() * left.impurity() + right.n() * right.impurity()) / n;
            if best.map_or(true, |(b, _)| score < b) {
                *best = Some((score, prev + (next - prev) / 2.0));
            }
        };

        for &(value, s) in entries.iter() {
            if zero_pending && value > 0.0 {
                if let Some(p) = prev {
                    if 0.0 > p {
                        consider(&left, p, 0.0, &mut best);
                    }
                }
                left.add(&zeros);
                prev = Some(0.0);
                zero_pending = false;
            }
            if let Some(p) = prev {
                if value > p {
                    consider(&left, p, value, &mut best);
                }
            }
            left.add_sample(target, s);
            prev = Some(value);
        }
        if zero_pending {
            if let Some(p) = prev {
                if 0.0 > p {
                    consider(&left, p, 0.0, &mut best);
                }
            }
        }
        best
    }

    /// Arena index of the leaf a row falls into
    pub fn leaf_index(&self, row: &ZeroSpVec<f64>) -> usize {
        let mut idx = 0;
        while let Some(Node::Split {
            feature,
            threshold,
            left,
            right,
        }) = self.nodes.get(idx)
        {
            idx = if row.get(*feature) <= *threshold {
                *left
            } else {
                *right
            };
        }
        idx
    }

    /// Leaf value for a row: class probabilities or `[value]`
    pub fn predict_row(&self, row: &ZeroSpVec<f64>) -> &[f64] {
        match self.nodes.get(self.leaf_index(row)) {
            Some(Node::Leaf { value }) => value,
            _ => &[],
        }
    }

    /// Overwrite a leaf value (used by boosting's Newton step)
    pub fn set_leaf_value(&mut self, leaf: usize, value: Vec<f64>) {
        if let Some(Node::Leaf { value: slot }) = self.nodes.get_mut(leaf) {
            *slot = value;
        }
    }

    /// Arena indices of every leaf
    pub fn leaves(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::Leaf { .. }))
            .map(|(i, _)| i)
            .collect()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}
