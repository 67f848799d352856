//! Random Forest regressor

use super::decision_tree::{DecisionTree, TreeConfig};
use crate::data::Dataset;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random Forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed; tree i uses seed + i
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 32,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 123,
        }
    }
}

/// Random Forest model: bagged regression trees averaged at predict time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Create a forest with `n_trees` trees seeded from `seed`
    pub fn with_trees(n_trees: usize, seed: u64) -> Self {
        Self::new(ForestConfig {
            n_trees,
            seed,
            ..Default::default()
        })
    }

    /// Train the forest.
    ///
    /// Trees are built in parallel; each tree gets its own deterministic
    /// seed, so results do not depend on thread scheduling.
    pub fn fit(&mut self, dataset: &Dataset) {
        self.feature_names = dataset.feature_names.clone();
        let n_features = dataset.n_features();

        let trees: Vec<DecisionTree> = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_config = TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: self.config.max_features,
                    seed: self.config.seed.wrapping_add(i as u64),
                };

                let mut tree = DecisionTree::new(tree_config);

                if self.config.bootstrap {
                    let sample = dataset.bootstrap_sample(self.config.seed.wrapping_add(i as u64));
                    tree.fit(&sample);
                } else {
                    tree.fit(dataset);
                }

                tree
            })
            .collect();

        self.trees = trees;

        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }

        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict_one(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Predict for multiple samples
    pub fn predict(&self, dataset: &Dataset) -> Vec<f64> {
        dataset
            .features
            .par_iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Predict for raw feature rows (no labels attached)
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.par_iter().map(|f| self.predict_one(f)).collect()
    }

    /// Mean squared error against a labelled dataset
    pub fn mse(&self, dataset: &Dataset) -> f64 {
        let predictions = self.predict(dataset);
        predictions
            .iter()
            .zip(dataset.labels.iter())
            .map(|(p, l)| (p - l).powi(2))
            .sum::<f64>()
            / dataset.n_samples() as f64
    }

    /// R² score against a labelled dataset
    pub fn r2_score(&self, dataset: &Dataset) -> f64 {
        let predictions = self.predict(dataset);
        let mean_label = dataset.labels.iter().sum::<f64>() / dataset.n_samples() as f64;

        let ss_res: f64 = predictions
            .iter()
            .zip(dataset.labels.iter())
            .map(|(p, l)| (l - p).powi(2))
            .sum();

        let ss_tot: f64 = dataset
            .labels
            .iter()
            .map(|l| (l - mean_label).powi(2))
            .sum();

        if ss_tot == 0.0 {
            0.0
        } else {
            1.0 - ss_res / ss_tot
        }
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Feature names with importances, sorted descending
    pub fn feature_importance_ranking(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(n, &i)| (n.as_str(), i))
            .collect();

        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        ranking
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noisy_dataset(n: usize) -> Dataset {
        let mut dataset = Dataset::new(vec!["x1".to_string(), "x2".to_string()]);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        for i in 0..n {
            let x1 = i as f64 / 20.0;
            let x2 = (i as f64 / 10.0).sin();
            let y = x1 + 2.0 * x2 + 0.1 * (i as f64 % 5.0);
            dataset.add_sample(vec![x1, x2], y, start + chrono::Duration::days(i as i64));
        }

        dataset
    }

    #[test]
    fn test_regression_fit() {
        let dataset = noisy_dataset(200);

        let mut forest = RandomForest::with_trees(10, 123);
        forest.fit(&dataset);

        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.feature_importances().len(), 2);
        assert!(forest.mse(&dataset) >= 0.0);
        assert!(forest.r2_score(&dataset) > 0.8);
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let dataset = noisy_dataset(150);

        let mut a = RandomForest::with_trees(15, 123);
        let mut b = RandomForest::with_trees(15, 123);
        a.fit(&dataset);
        b.fit(&dataset);

        assert_eq!(a.predict(&dataset), b.predict(&dataset));
        assert_eq!(a.mse(&dataset), b.mse(&dataset));
    }

    #[test]
    fn test_different_seeds_differ() {
        let dataset = noisy_dataset(150);

        let mut a = RandomForest::with_trees(15, 123);
        let mut b = RandomForest::with_trees(15, 999);
        a.fit(&dataset);
        b.fit(&dataset);

        assert_ne!(a.predict(&dataset), b.predict(&dataset));
    }

    #[test]
    fn test_identical_rows_get_identical_predictions() {
        let dataset = noisy_dataset(120);

        let mut forest = RandomForest::with_trees(10, 123);
        forest.fit(&dataset);

        let row = dataset.features[60].clone();
        let rows = vec![row.clone(); 5];
        let predictions = forest.predict_rows(&rows);

        assert!(predictions.windows(2).all(|w| w[0] == w[1]));
    }
}
