use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Settings for an MNIST training / evaluation run.
///
/// # Fields
/// - `epochs`     — full passes over `train_file`
/// - `train_file` — CSV with `label, pixel_0 .. pixel_783` rows
/// - `test_file`  — CSV scored by `evaluate`
/// - `model_path` — base path for the `h`/`o` weight files
/// - `seed`       — fixes weight initialization when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub model_path: PathBuf,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 5,
            train_file: PathBuf::from("mnist_dataset/mnist_train.csv"),
            test_file: PathBuf::from("mnist_dataset/mnist_test.csv"),
            model_path: PathBuf::from("data/weights.model"),
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::InvalidConfig("epochs must be at least 1".into()));
        }
        Ok(())
    }
}
