//! Dataset structure for model training

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Feature rows with their target closing prices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Target closing price per row
    pub labels: Vec<f64>,
    /// Feature names
    pub feature_names: Vec<String>,
    /// Trading date of each row
    pub dates: Vec<NaiveDate>,
}

/// Train/test split result
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_names,
            dates: Vec::new(),
        }
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Add a sample
    pub fn add_sample(&mut self, features: Vec<f64>, label: f64, date: NaiveDate) {
        assert_eq!(features.len(), self.feature_names.len());
        self.features.push(features);
        self.labels.push(label);
        self.dates.push(date);
    }

    /// Randomized shuffle split with a fixed seed.
    ///
    /// Ignores temporal ordering, so test rows may predate training rows.
    /// That leaks future information into training on time-series data;
    /// use [`train_test_split`](Self::train_test_split) for a
    /// chronological partition.
    pub fn random_split(&self, test_ratio: f64, seed: u64) -> Split {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let test_size = (test_ratio * n as f64) as usize;
        let (test_indices, train_indices) = indices.split_at(test_size);

        Split {
            train: self.subset(train_indices),
            test: self.subset(test_indices),
        }
    }

    /// Chronological split: the most recent `test_ratio` of rows become
    /// the test set
    pub fn train_test_split(&self, test_ratio: f64) -> Split {
        let n = self.n_samples();
        let train_size = ((1.0 - test_ratio) * n as f64) as usize;

        let train_indices: Vec<usize> = (0..train_size).collect();
        let test_indices: Vec<usize> = (train_size..n).collect();

        Split {
            train: self.subset(&train_indices),
            test: self.subset(&test_indices),
        }
    }

    /// Create a subset of the dataset by indices
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            feature_names: self.feature_names.clone(),
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
        }
    }

    /// Bootstrap sample (random sample with replacement)
    pub fn bootstrap_sample(&self, seed: u64) -> Dataset {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = self.n_samples();

        let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

        self.subset(&indices)
    }
}
