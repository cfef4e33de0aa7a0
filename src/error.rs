//! Error types for the forecasting engine

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the forecasting engine and its tooling
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed caller input (parameters or price series)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numeric failure inside the predictor (divergence, non-finite output)
    #[error("Computation fault: {0}")]
    Computation(String),

    /// Training exceeded its time budget
    #[error("Training timed out after {0:?}")]
    TrainingTimeout(Duration),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, ForecastError::Validation(_))
    }

    /// True for faults the engine absorbs into a degraded forecast
    pub fn is_computation_fault(&self) -> bool {
        matches!(
            self,
            ForecastError::Computation(_) | ForecastError::TrainingTimeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
