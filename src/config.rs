//! Run configuration for the `ferrite-mlp` binary.
//!
//! Every field is optional so a JSON file can set only what it cares about;
//! command-line flags are parsed into the same type and merged on top.
//!
//! ```json
//! {
//!   "layer_sizes": [784, 30, 10],
//!   "epochs": 10,
//!   "mini_batch_size": 10,
//!   "learning_rate": 3.0,
//!   "seed": 7
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::encoding::DEFAULT_NUM_CLASSES;
use crate::error::{Error, Result};
use crate::network::network::validate_layer_sizes;
use crate::train::train_config::TrainConfig;

pub const DEFAULT_LAYER_SIZES: [usize; 4] = [784, 128, 64, 10];
pub const DEFAULT_EPOCHS: usize = 30;
pub const DEFAULT_MINI_BATCH_SIZE: usize = 32;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub layer_sizes: Option<Vec<usize>>,
    pub epochs: Option<usize>,
    pub mini_batch_size: Option<usize>,
    pub learning_rate: Option<f64>,
    pub seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub num_classes: Option<usize>,
    /// Compute per-sample gradients of a mini-batch in parallel.
    pub parallel: Option<bool>,
    /// Use only the first N training samples.
    pub train_limit: Option<usize>,
    /// Use only the first N test samples.
    pub test_limit: Option<usize>,
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    // merge configs where the second overwrites the first
    pub fn merge(self, other: Self) -> Self {
        Self {
            layer_sizes: other.layer_sizes.or(self.layer_sizes),
            epochs: other.epochs.or(self.epochs),
            mini_batch_size: other.mini_batch_size.or(self.mini_batch_size),
            learning_rate: other.learning_rate.or(self.learning_rate),
            seed: other.seed.or(self.seed),
            data_dir: other.data_dir.or(self.data_dir),
            num_classes: other.num_classes.or(self.num_classes),
            parallel: other.parallel.or(self.parallel),
            train_limit: other.train_limit.or(self.train_limit),
            test_limit: other.test_limit.or(self.test_limit),
        }
    }

    /// Fills in defaults and validates the result.
    pub fn resolve(self) -> Result<RunSettings> {
        let settings = RunSettings {
            layer_sizes: self.layer_sizes.unwrap_or_else(|| DEFAULT_LAYER_SIZES.to_vec()),
            epochs: self.epochs.unwrap_or(DEFAULT_EPOCHS),
            mini_batch_size: self.mini_batch_size.unwrap_or(DEFAULT_MINI_BATCH_SIZE),
            learning_rate: self.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            data_dir: self.data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            num_classes: self.num_classes.unwrap_or(DEFAULT_NUM_CLASSES),
            parallel: self.parallel.unwrap_or(false),
            train_limit: self.train_limit,
            test_limit: self.test_limit,
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// A fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSettings {
    pub layer_sizes: Vec<usize>,
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub num_classes: usize,
    pub parallel: bool,
    pub train_limit: Option<usize>,
    pub test_limit: Option<usize>,
}

impl RunSettings {
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.mini_batch_size, self.learning_rate)
            .with_parallel(self.parallel)
    }

    fn validate(&self) -> Result<()> {
        validate_layer_sizes(&self.layer_sizes)?;
        self.train_config().validate()?;
        let outputs = self.layer_sizes[self.layer_sizes.len() - 1];
        if outputs != self.num_classes {
            return Err(Error::config(format!(
                "output layer has {} units but the dataset has {} classes",
                outputs, self.num_classes
            )));
        }
        Ok(())
    }
}
