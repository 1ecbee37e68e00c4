use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// Hyperparameters for one `Trainer::train` run.
///
/// The learning rate itself lives in the `Trainer`, which decays it in place.
///
/// # Fields
/// - `epochs`              — total number of full passes over the training data
/// - `validation_split`    — fraction in `[0, 1]` taken from the **front** of the
///                           data as a validation set; `0` disables validation
/// - `learning_rate_decay` — factor the learning rate is multiplied by after
///                           every epoch, including the last
/// - `check_finite`        — run `Network::detect_nan` after each epoch and
///                           abort on the first non-finite parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub validation_split: f64,
    pub learning_rate_decay: f64,
    pub check_finite: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 3,
            validation_split: 0.2,
            learning_rate_decay: 0.95,
            check_finite: false,
        }
    }
}

impl TrainConfig {
    /// Creates a config for `epochs` epochs with no validation and default decay.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            validation_split: 0.0,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.validation_split) {
            return Err(NnError::InvalidConfig(format!(
                "validation_split must be in [0, 1], got {}",
                self.validation_split
            )));
        }
        if !self.learning_rate_decay.is_finite() {
            return Err(NnError::InvalidConfig("learning_rate_decay must be finite".into()));
        }
        Ok(())
    }

    /// Number of leading samples held out for validation out of `n`.
    pub fn validation_len(&self, n: usize) -> usize {
        (n as f64 * self.validation_split) as usize
    }

    /// Deserializes a `TrainConfig` from a JSON file; missing fields take their defaults.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let config: TrainConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
