//! Bootstrap-aggregated regression trees.
//!
//! Each tree is a CART regressor grown on a bootstrap sample of the training
//! rows, splitting on the threshold that most reduces the summed squared
//! error.  All features are candidates at every split.  Tree `t` draws its
//! bootstrap sample from `StreamRng::new(seed, t)`, so a forest is a pure
//! function of `(rows, targets, params)` regardless of thread scheduling.
//!
//! Trees are stored as flat arenas of [`TreeNode`]s; children are indices
//! into the same `Vec`.

use serde::{Deserialize, Serialize};

use br_core::StreamRng;

use crate::{ModelError, ModelResult};

// ── ForestParams ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators:      usize,
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
    pub seed:              u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            min_samples_leaf:  1,
            seed:              42,
        }
    }
}

// ── Tree ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature:   usize,
        threshold: f64,
        left:      u32,
        right:     u32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Walk from the root to a leaf.  Children always sit after their parent
    /// in the arena; a tree that breaks that (or indexes past `row`) is
    /// reported instead of followed.
    pub fn predict(&self, row: &[f64]) -> ModelResult<f64> {
        let mut i = 0usize;
        loop {
            match self.nodes.get(i) {
                Some(&TreeNode::Leaf { value }) => return Ok(value),
                Some(&TreeNode::Split { feature, threshold, left, right }) => {
                    let x = row.get(feature).ok_or_else(|| {
                        malformed(format!("node {i} splits on feature {feature} of {}", row.len()))
                    })?;
                    let next = if *x <= threshold { left } else { right };
                    let next = next as usize;
                    if next <= i {
                        return Err(malformed(format!("node {i} points back to node {next}")));
                    }
                    i = next;
                }
                None => return Err(malformed(format!("node {i} is missing"))),
            }
        }
    }

    /// Structural check for a tree read from an artifact.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {i} has value {value}"));
                    }
                }
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(format!("node {i} splits on feature {feature} of {n_features}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has threshold {threshold}"));
                    }
                    for child in [left as usize, right as usize] {
                        if child <= i || child >= len {
                            return Err(format!("node {i} has child {child} (tree has {len} nodes)"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], i: usize) -> usize {
            match nodes.get(i) {
                Some(&TreeNode::Split { left, right, .. }) => {
                    let (l, r) = (left as usize, right as usize);
                    let down = |c: usize| if c > i { walk(nodes, c) } else { 0 };
                    1 + down(l).max(down(r))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

fn malformed(reason: String) -> ModelError {
    ModelError::MalformedModel(reason)
}

/// Grows one tree and tallies its per-feature SSE reduction.
struct Grower<'a, R> {
    rows:       &'a [R],
    targets:    &'a [f64],
    params:     &'a ForestParams,
    n_features: usize,
    nodes:      Vec<TreeNode>,
    importance: Vec<f64>,
}

struct BestSplit {
    feature:   usize,
    threshold: f64,
    /// Number of sorted samples that go left.
    left_len:  usize,
    gain:      f64,
}

impl<'a, R: AsRef<[f64]>> Grower<'a, R> {
    fn x(&self, sample: usize, feature: usize) -> f64 {
        self.rows[sample].as_ref()[feature]
    }

    fn grow(&mut self, samples: &mut [usize], depth: usize) -> u32 {
        let id = self.nodes.len() as u32;
        let n = samples.len();
        let (sum, sum_sq) = samples.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let y = self.targets[i];
            (s + y, sq + y * y)
        });
        let mean = sum / n as f64;
        self.nodes.push(TreeNode::Leaf { value: mean });

        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || n < self.params.min_samples_split.max(2) {
            return id;
        }
        let parent_sse = sum_sq - sum * sum / n as f64;
        if parent_sse <= f64::EPSILON {
            return id;
        }

        let Some(best) = self.best_split(samples, parent_sse) else {
            return id;
        };
        self.importance[best.feature] += best.gain;

        samples.sort_by(|&a, &b| self.x(a, best.feature).total_cmp(&self.x(b, best.feature)));
        let (left_samples, right_samples) = samples.split_at_mut(best.left_len);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);
        self.nodes[id as usize] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&self, samples: &[usize], parent_sse: f64) -> Option<BestSplit> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut order = samples.to_vec();
        let mut best: Option<BestSplit> = None;

        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| self.x(a, feature).total_cmp(&self.x(b, feature)));
            let total: f64 = order.iter().map(|&i| self.targets[i]).sum();
            let total_sq: f64 = order.iter().map(|&i| self.targets[i].powi(2)).sum();

            let (mut left_sum, mut left_sq) = (0.0, 0.0);
            for k in 1..n {
                let y = self.targets[order[k - 1]];
                left_sum += y;
                left_sq += y * y;

                let (lo, hi) = (self.x(order[k - 1], feature), self.x(order[k], feature));
                if lo >= hi || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let (nl, nr) = (k as f64, (n - k) as f64);
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let child_sse = (left_sq - left_sum * left_sum / nl)
                    + (right_sq - right_sum * right_sum / nr);
                let gain = parent_sse - child_sse;

                if gain > 1e-12 && best.as_ref().is_none_or(|b| gain > b.gain) {
                    let mid = lo / 2.0 + hi / 2.0;
                    // Rounding can push the midpoint out of `[lo, hi)` for
                    // adjacent or subnormal values.
                    let threshold = if lo <= mid && mid < hi { mid } else { lo };
                    best = Some(BestSplit { feature, threshold, left_len: k, gain });
                }
            }
        }
        best
    }
}

// ── RandomForest ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params:      ForestParams,
    n_features:  usize,
    trees:       Vec<RegressionTree>,
    /// Normalised mean SSE reduction per feature.  All zero if no tree split.
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit on `rows` (all of equal length) against `targets`.
    pub fn fit<R>(rows: &[R], targets: &[f64], params: &ForestParams) -> ModelResult<Self>
    where
        R: AsRef<[f64]> + Sync,
    {
        if rows.is_empty() || params.n_estimators == 0 {
            return Err(ModelError::InsufficientData { needed: 1, got: rows.len() });
        }
        if targets.len() != rows.len() {
            return Err(ModelError::FeatureLength { expected: rows.len(), got: targets.len() });
        }
        let n_features = rows[0].as_ref().len();
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_features {
                return Err(ModelError::FeatureLength { expected: n_features, got: row.len() });
            }
            if let Some(index) = row.iter().position(|v| !v.is_finite()) {
                return Err(ModelError::NonFiniteFeature { index });
            }
        }

        let grow_one = |t: usize| -> (RegressionTree, Vec<f64>) {
            let mut rng = StreamRng::new(params.seed, t as u64);
            let mut samples: Vec<usize> = (0..rows.len()).map(|_| rng.index(rows.len())).collect();
            let mut grower = Grower {
                rows,
                targets,
                params,
                n_features,
                nodes: Vec::new(),
                importance: vec![0.0; n_features],
            };
            grower.grow(&mut samples, 0);
            (RegressionTree { nodes: grower.nodes }, grower.importance)
        };

        #[cfg(not(feature = "parallel"))]
        let grown: Vec<_> = (0..params.n_estimators).map(grow_one).collect();

        #[cfg(feature = "parallel")]
        let grown: Vec<_> = {
            use rayon::prelude::*;
            (0..params.n_estimators).into_par_iter().map(grow_one).collect()
        };

        let mut importances = vec![0.0; n_features];
        let mut trees = Vec::with_capacity(grown.len());
        for (tree, mut imp) in grown {
            normalise(&mut imp);
            for (acc, v) in importances.iter_mut().zip(&imp) {
                *acc += v;
            }
            trees.push(tree);
        }
        normalise(&mut importances);

        Ok(Self { params: params.clone(), n_features, trees, importances })
    }

    /// Mean of the per-tree predictions.
    pub fn predict(&self, row: &[f64]) -> ModelResult<f64> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if row.len() != self.n_features {
            return Err(ModelError::FeatureLength { expected: self.n_features, got: row.len() });
        }
        if let Some(index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Check every tree against `n_features` and the importances' length.
    /// Forests deserialised from an artifact must pass this before use.
    pub fn validate(&self) -> ModelResult<()> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if self.importances.len() != self.n_features {
            return Err(malformed(format!(
                "{} importances for {} features",
                self.importances.len(),
                self.n_features
            )));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|reason| malformed(format!("tree {t}: {reason}")))?;
        }
        Ok(())
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

/// Scale to sum 1; leave an all-zero vector untouched.
fn normalise(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}
