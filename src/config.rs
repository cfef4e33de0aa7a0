//! Engine configuration
//!
//! Loaded from an optional TOML file layered under `CROP_FORECAST__*`
//! environment variables. Every field has a default, so an empty file (or no
//! file at all) yields the stock engine.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix, e.g. `CROP_FORECAST__ENGINE__SEED=7`
pub const ENV_PREFIX: &str = "CROP_FORECAST";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from `path` (if it exists) and the environment
    pub fn load(path: &str) -> Result<Self> {
        let path = shellexpand::tilde(path).into_owned();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }
}

/// Forecast engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub training: TrainingConfig,
    /// Upper bound on one training run
    #[serde(default = "default_training_timeout_secs")]
    pub training_timeout_secs: u64,
    /// Fixed RNG seed for reproducible training; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Trailing window of the historical moving average
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,
    /// Predictions and actuals compared when scoring confidence
    #[serde(default = "default_confidence_sample")]
    pub confidence_sample: usize,
    /// History returned as the moving average on fallback paths
    #[serde(default = "default_history_tail")]
    pub history_tail: usize,
    /// Volatility (percent) above which a warning factor is added
    #[serde(default = "default_high_volatility_threshold")]
    pub high_volatility_threshold: f64,
    /// Seasonal/trend weight above which the adjustment is reported
    #[serde(default = "default_weight_note_threshold")]
    pub weight_note_threshold: f64,
    /// Percent move of the mean prediction that counts as a trend
    #[serde(default = "default_trend_threshold_pct")]
    pub trend_threshold_pct: f64,
}

fn default_training_timeout_secs() -> u64 {
    30
}

fn default_moving_average_window() -> usize {
    7
}

fn default_confidence_sample() -> usize {
    5
}

fn default_history_tail() -> usize {
    14
}

fn default_high_volatility_threshold() -> f64 {
    10.0
}

fn default_weight_note_threshold() -> f64 {
    0.3
}

fn default_trend_threshold_pct() -> f64 {
    2.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            training: TrainingConfig::default(),
            training_timeout_secs: default_training_timeout_secs(),
            seed: None,
            moving_average_window: default_moving_average_window(),
            confidence_sample: default_confidence_sample(),
            history_tail: default_history_tail(),
            high_volatility_threshold: default_high_volatility_threshold(),
            weight_note_threshold: default_weight_note_threshold(),
            trend_threshold_pct: default_trend_threshold_pct(),
        }
    }
}

impl EngineConfig {
    pub fn training_timeout(&self) -> Duration {
        Duration::from_secs(self.training_timeout_secs)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        if self.training_timeout_secs == 0 {
            return Err(ForecastError::Validation(
                "training_timeout_secs must be positive".to_string(),
            ));
        }
        if self.moving_average_window == 0 || self.confidence_sample == 0 {
            return Err(ForecastError::Validation(
                "moving_average_window and confidence_sample must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Network shape and optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_hidden_units")]
    pub hidden_units: Vec<usize>,
    /// Dropout rate after each hidden layer
    #[serde(default = "default_dropout")]
    pub dropout: Vec<f64>,
    /// L2 kernel penalty for each hidden layer
    #[serde(default = "default_l2")]
    pub l2: Vec<f64>,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Trailing fraction of samples held out for validation
    #[serde(default = "default_validation_split")]
    pub validation_split: f64,
}

fn default_hidden_units() -> Vec<usize> {
    vec![64, 32, 16]
}

fn default_dropout() -> Vec<f64> {
    vec![0.2, 0.1, 0.0]
}

fn default_l2() -> Vec<f64> {
    vec![0.001, 0.001, 0.0]
}

fn default_learning_rate() -> f64 {
    0.01
}

fn default_epochs() -> usize {
    30
}

fn default_batch_size() -> usize {
    16
}

fn default_validation_split() -> f64 {
    0.2
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden_units: default_hidden_units(),
            dropout: default_dropout(),
            l2: default_l2(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
            batch_size: default_batch_size(),
            validation_split: default_validation_split(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        let layers = self.hidden_units.len();
        if layers == 0 || self.hidden_units.contains(&0) {
            return Err(ForecastError::Validation(
                "hidden_units must list at least one non-empty layer".to_string(),
            ));
        }
        if self.dropout.len() != layers || self.l2.len() != layers {
            return Err(ForecastError::Validation(format!(
                "dropout and l2 need one entry per hidden layer ({})",
                layers
            )));
        }
        if self.dropout.iter().any(|d| !(0.0..1.0).contains(d)) {
            return Err(ForecastError::Validation(
                "dropout rates must be within [0, 1)".to_string(),
            ));
        }
        if self.l2.iter().any(|l| !l.is_finite() || *l < 0.0) {
            return Err(ForecastError::Validation(
                "l2 penalties must be non-negative".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ForecastError::Validation(
                "learning_rate must be positive".to_string(),
            ));
        }
        if self.epochs == 0 || self.batch_size == 0 {
            return Err(ForecastError::Validation(
                "epochs and batch_size must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(ForecastError::Validation(
                "validation_split must be within [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}
