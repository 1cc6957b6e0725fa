// Bagged decision-tree ensemble

use hoops_models::{HoopsError, Result};
use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality, TreeNode};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use crate::models::ProbabilityModel;

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    /// Columns drawn for each tree; `None` means `ceil(sqrt(n_features))`.
    pub max_features: Option<usize>,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 42,
            max_depth: None,
            max_features: None,
        }
    }
}

impl RandomForestParams {
    /// Each tree sees a bootstrap resample of the rows and a random subset of
    /// the columns; sample weights ride along with their rows into the split
    /// criterion and into the leaf win rates.
    pub fn fit(
        &self,
        records: &Array2<f64>,
        targets: &Array1<bool>,
        sample_weights: &Array1<f64>,
    ) -> Result<RandomForestModel> {
        let (n, d) = records.dim();
        if n == 0 || targets.len() != n || sample_weights.len() != n {
            return Err(HoopsError::Training {
                reason: format!(
                    "random forest needs matching rows: {} records, {} targets, {} weights",
                    n,
                    targets.len(),
                    sample_weights.len()
                ),
            });
        }
        if self.n_trees == 0 || d == 0 {
            return Err(HoopsError::Training {
                reason: format!("random forest needs trees and columns, got {} trees, {} columns", self.n_trees, d),
            });
        }

        let n_columns = self
            .max_features
            .unwrap_or_else(|| (d as f64).sqrt().ceil() as usize)
            .clamp(1, d);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut columns = index::sample(&mut rng, d, n_columns).into_vec();
            columns.sort_unstable();

            let weights: Array1<f32> = sample.iter().map(|&i| sample_weights[i] as f32).collect();
            let dataset = Dataset::new(
                records.select(Axis(0), &sample).select(Axis(1), &columns),
                targets.select(Axis(0), &sample),
            )
            .with_weights(weights);

            let tree = DecisionTree::<f64, bool>::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(self.max_depth)
                .fit(&dataset)
                .map_err(|e| HoopsError::Training {
                    reason: format!("decision tree fit failed: {e}"),
                })?;

            let mut forest_tree = ForestTree {
                tree,
                columns,
                leaves: HashMap::new(),
                overall: LeafStats::default(),
            };
            for &i in &sample {
                let stats = LeafStats::single(targets[i], sample_weights[i]);
                let path = forest_tree.leaf_path(records.row(i));
                forest_tree.leaves.entry(path).or_default().add(stats);
                forest_tree.overall.add(stats);
            }
            trees.push(forest_tree);
        }

        debug!("Fitted {} trees on {} rows, {} of {} columns each", trees.len(), n, n_columns, d);
        Ok(RandomForestModel { trees, n_features: d })
    }
}

/// Weighted win count of the bootstrap rows that reached a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LeafStats {
    wins: f64,
    total: f64,
}

impl LeafStats {
    fn single(win: bool, weight: f64) -> Self {
        Self {
            wins: if win { weight } else { 0.0 },
            total: weight,
        }
    }

    fn add(&mut self, other: Self) {
        self.wins += other.wins;
        self.total += other.total;
    }

    fn win_rate(&self) -> Option<f64> {
        (self.total > 0.0).then(|| self.wins / self.total)
    }
}

struct ForestTree {
    tree: DecisionTree<f64, bool>,
    /// Full-matrix column behind each of the tree's features.
    columns: Vec<usize>,
    leaves: HashMap<Vec<bool>, LeafStats>,
    overall: LeafStats,
}

impl ForestTree {
    /// Left/right turns from the root to the leaf `row` lands in.
    fn leaf_path(&self, row: ArrayView1<f64>) -> Vec<bool> {
        let mut node: &TreeNode<f64, bool> = self.tree.root_node();
        let mut path = Vec::new();
        while !node.is_leaf() {
            let (feature, threshold, _) = node.split();
            let go_right = row[self.columns[feature]] >= threshold;
            let next = node
                .children()
                .into_iter()
                .nth(usize::from(go_right))
                .and_then(|child| child.as_deref());
            match next {
                Some(child) => node = child,
                None => break,
            }
            path.push(go_right);
        }
        path
    }

    /// Weighted team1 win rate of the training rows sharing `row`'s leaf.
    fn win_rate(&self, row: ArrayView1<f64>) -> f64 {
        self.leaves
            .get(&self.leaf_path(row))
            .and_then(LeafStats::win_rate)
            .or_else(|| self.overall.win_rate())
            .unwrap_or(0.5)
    }
}

pub struct RandomForestModel {
    trees: Vec<ForestTree>,
    n_features: usize,
}

impl fmt::Debug for RandomForestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForestModel")
            .field("n_trees", &self.trees.len())
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl RandomForestModel {
    pub fn params() -> RandomForestParams {
        RandomForestParams::default()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean impurity decrease per column across trees, normalised to sum to 1.
    /// Columns a tree never saw count as zero for that tree.
    pub fn feature_importances(&self) -> Array1<f64> {
        let mut total = Array1::<f64>::zeros(self.n_features);
        for forest_tree in &self.trees {
            let importance = forest_tree.tree.feature_importance();
            if importance.len() != forest_tree.columns.len() {
                continue;
            }
            for (&column, value) in forest_tree.columns.iter().zip(importance.iter()) {
                if value.is_finite() {
                    total[column] += *value;
                }
            }
        }
        let sum = total.sum();
        if sum > 0.0 {
            total / sum
        } else {
            total
        }
    }
}

impl ProbabilityModel for RandomForestModel {
    fn model_name(&self) -> &str {
        "RandomForest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean over trees of the leaf's weighted team1 win rate.
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(records)?;
        let n_trees = self.trees.len() as f64;
        Ok(records
            .axis_iter(Axis(0))
            .map(|row| self.trees.iter().map(|t| t.win_rate(row)).sum::<f64>() / n_trees)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<bool>, Array1<f64>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            if i % 2 == 0 {
                rows.extend_from_slice(&[1.0, 0.0, 0.0]);
                labels.push(true);
            } else {
                rows.extend_from_slice(&[0.0, 1.0, 0.0]);
                labels.push(false);
            }
        }
        let x = Array2::from_shape_vec((40, 3), rows).unwrap();
        (x, Array1::from_vec(labels), Array1::from_elem(40, 1.0))
    }

    #[test]
    fn test_forest_separates_clean_signal() {
        let (x, y, w) = separable();
        let params = RandomForestParams { n_trees: 25, ..RandomForestParams::default() };
        let forest = params.fit(&x, &y, &w).unwrap();
        let probs = forest.predict_proba(&array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert!(probs[0] > 0.9);
        assert!(probs[1] < 0.1);
    }

    #[test]
    fn test_repeated_rows_give_win_rate_not_majority_vote() {
        // One fixture, identical rows, team1 wins nine in ten.
        let x = Array2::from_elem((40, 2), 1.0);
        let y: Array1<bool> = (0..40).map(|i| i % 10 != 0).collect();
        let w = Array1::from_elem(40, 1.0);

        let params = RandomForestParams { n_trees: 100, ..RandomForestParams::default() };
        let p = params.fit(&x, &y, &w).unwrap().predict_proba(&array![[1.0, 1.0]]).unwrap()[0];

        assert!((p - 0.9).abs() < 0.05, "forest probability {p}");
    }

    #[test]
    fn test_leaf_rates_follow_sample_weights() {
        let x = Array2::from_elem((4, 1), 1.0);
        let y = array![true, true, false, false];
        let params = RandomForestParams { n_trees: 50, ..RandomForestParams::default() };

        let even = params.fit(&x, &y, &array![1.0, 1.0, 1.0, 1.0]).unwrap();
        let favour_wins = params.fit(&x, &y, &array![2.0, 2.0, 1.0, 1.0]).unwrap();
        let query = array![[1.0]];

        assert!(favour_wins.predict_proba(&query).unwrap()[0] > even.predict_proba(&query).unwrap()[0]);
    }

    #[test]
    fn test_each_tree_gets_a_column_subset() {
        let (x, y, w) = separable();
        let params = RandomForestParams { n_trees: 12, ..RandomForestParams::default() };
        let forest = params.fit(&x, &y, &w).unwrap();

        // ceil(sqrt(3)) = 2 of 3 columns per tree.
        assert!(forest.trees.iter().all(|t| t.columns.len() == 2));
        assert!(forest.trees.iter().any(|t| t.columns != forest.trees[0].columns));

        let all = RandomForestParams { max_features: Some(10), ..params }.fit(&x, &y, &w).unwrap();
        assert!(all.trees.iter().all(|t| t.columns == vec![0, 1, 2]));
    }

    #[test]
    fn test_importances_are_normalised() {
        let (x, y, w) = separable();
        let params = RandomForestParams { n_trees: 10, ..RandomForestParams::default() };
        let importances = params.fit(&x, &y, &w).unwrap().feature_importances();

        assert_eq!(importances.len(), 3);
        assert_relative_eq!(importances.sum(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(importances[2], 0.0);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y, w) = separable();
        let params = RandomForestParams { n_trees: 8, ..RandomForestParams::default() };
        let query = array![[1.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let a = params.fit(&x, &y, &w).unwrap().predict_proba(&query).unwrap();
        let b = params.fit(&x, &y, &w).unwrap().predict_proba(&query).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_width_mismatch_and_empty_input() {
        let (x, y, w) = separable();
        let forest = RandomForestParams { n_trees: 2, ..RandomForestParams::default() }
            .fit(&x, &y, &w)
            .unwrap();
        assert!(forest.predict_proba(&array![[1.0, 0.0]]).is_err());

        let empty = Array2::<f64>::zeros((0, 3));
        let result = RandomForestModel::params().fit(&empty, &Array1::from_vec(vec![]), &Array1::zeros(0));
        assert!(result.is_err());
    }
}
