//! Machine learning prediction module
//!
//! Provides the trainable next-price regressor with:
//! - Min-max normalization between price and model space
//! - Sliding-window training pair construction
//! - A dense network trained with Adam, L2 and dropout
//! - Autoregressive multi-step rollout

pub mod network;
pub mod normalizer;
pub mod optimizer;
pub mod predictor;
pub mod sequence;


pub use normalizer::{denormalize, normalize, Normalizer};
pub use predictor::{NeuralPredictor, NeuralTrainer, TrainingReport};
pub use sequence::{build_sequences, TrainingSet};

use crate::error::{ForecastError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

/// Number of consecutive prices fed to the predictor per step
pub const WINDOW_SIZE: usize = 7;

/// A trained next-value regressor over normalized prices
pub trait PricePredictor: Send + Sync + Debug {
    /// Fixed input width
    fn window_size(&self) -> usize;

    /// One forward pass over exactly `window_size()` values
    fn predict_next(&self, window: &[f64]) -> Result<f64>;

    /// Autoregressive rollout: each prediction is appended to the window and
    /// the oldest value dropped, producing exactly `steps` values. Errors
    /// compound across steps; nothing corrects the rollout.
    fn forecast_steps(&self, initial_window: &[f64], steps: usize) -> Result<Vec<f64>> {
        if initial_window.len() != self.window_size() {
            return Err(ForecastError::Validation(format!(
                "initial window has {} values, model expects {}",
                initial_window.len(),
                self.window_size()
            )));
        }

        let mut window: VecDeque<f64> = initial_window.iter().copied().collect();
        let mut outputs = Vec::with_capacity(steps);

        for step in 0..steps {
            let input: Vec<f64> = window.iter().copied().collect();
            let next = self.predict_next(&input)?;
            if !next.is_finite() {
                return Err(ForecastError::Computation(format!(
                    "non-finite value at rollout step {}",
                    step + 1
                )));
            }
            outputs.push(next);
            window.pop_front();
            window.push_back(next);
        }

        Ok(outputs)
    }

    /// Training diagnostics, if the predictor was trained in-process
    fn report(&self) -> Option<&TrainingReport> {
        None
    }
}

/// Produces a trained predictor from a training set
#[async_trait]
pub trait ModelTrainer: Send + Sync {
    async fn train(&self, set: &TrainingSet) -> Result<Arc<dyn PricePredictor>>;

    /// Trainer name for logging
    fn name(&self) -> &str;
}
