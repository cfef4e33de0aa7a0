//! Neural price predictor
//!
//! Trains the feed-forward network on sliding-window pairs and exposes it
//! through [`PricePredictor`]. Training is an async unit of work that yields
//! to the runtime after every epoch, so it can share a worker thread with
//! other requests and be abandoned between epochs.
//!
//! Usage:
//! ```ignore
//! let trainer = NeuralTrainer::new(TrainingConfig::default(), None);
//! let model = trainer.fit(&build_sequences(&normalized, WINDOW_SIZE)).await?;
//! let next = model.forecast_steps(&normalized[normalized.len() - 7..], 14)?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::network::{Gradients, Network};
use super::optimizer::Adam;
use super::sequence::TrainingSet;
use super::{ModelTrainer, PricePredictor};
use crate::config::TrainingConfig;
use crate::error::{ForecastError, Result};

/// Outcome of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub samples: usize,
    pub validation_samples: usize,
    /// Training MSE plus regularization after the last epoch
    pub final_train_loss: f64,
    /// Lowest validation MSE seen, when a validation set existed
    pub best_validation_loss: Option<f64>,
    pub trained_at: DateTime<Utc>,
}

/// Trained network bound to a fixed input window
#[derive(Debug, Clone)]
pub struct NeuralPredictor {
    network: Network,
    report: TrainingReport,
}

impl NeuralPredictor {
    pub fn network(&self) -> &Network {
        &self.network
    }
}

impl PricePredictor for NeuralPredictor {
    fn window_size(&self) -> usize {
        self.network.input_width()
    }

    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.window_size() {
            return Err(ForecastError::Validation(format!(
                "window has {} values, model expects {}",
                window.len(),
                self.window_size()
            )));
        }

        let value = self.network.predict(window);
        if !value.is_finite() {
            return Err(ForecastError::Computation(
                "network produced a non-finite prediction".to_string(),
            ));
        }
        Ok(value)
    }

    fn report(&self) -> Option<&TrainingReport> {
        Some(&self.report)
    }
}

/// Builds [`NeuralPredictor`]s with mini-batch Adam
#[derive(Debug, Clone)]
pub struct NeuralTrainer {
    config: TrainingConfig,
    seed: Option<u64>,
}

impl NeuralTrainer {
    pub fn new(config: TrainingConfig, seed: Option<u64>) -> Self {
        Self { config, seed }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Train a fresh network on `set`
    pub async fn fit(&self, set: &TrainingSet) -> Result<NeuralPredictor> {
        self.config.validate()?;
        if set.is_empty() || set.window == 0 {
            return Err(ForecastError::Computation(
                "no training samples".to_string(),
            ));
        }

        let mut rng = self.rng();
        let mut network = Network::new(set.window, &self.config, &mut rng);
        let mut adam = Adam::new(self.config.learning_rate, &network);

        let (train, validation) = set.split(self.config.validation_split);
        let batch_size = self.config.batch_size.min(train.len()).max(1);
        let mut order: Vec<usize> = (0..train.len()).collect();

        let mut best: Option<(f64, Network)> = None;
        let mut final_train_loss = f64::NAN;

        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);
            let mut squared_error = 0.0;

            for batch in order.chunks(batch_size) {
                let mut grads = Gradients::zeros(&network);
                let scale = 2.0 / batch.len() as f64;

                for &idx in batch {
                    let (output, traces) = network.forward_train(&train.inputs[idx], &mut rng);
                    let err = output - train.targets[idx];
                    squared_error += err * err;
                    network.backward(&traces, scale * err, &mut grads);
                }

                network.add_l2_gradients(&mut grads);
                adam.apply(&mut network, &grads);
            }

            let train_loss = squared_error / train.len() as f64 + network.l2_penalty();
            if !train_loss.is_finite() || !network.is_finite() {
                return Err(ForecastError::Computation(format!(
                    "training diverged at epoch {}",
                    epoch
                )));
            }
            final_train_loss = train_loss;

            if !validation.is_empty() {
                let val_loss = network.mse(&validation);
                let improved = best.as_ref().map_or(true, |(b, _)| val_loss < *b);
                if val_loss.is_finite() && improved {
                    best = Some((val_loss, network.clone()));
                }
            }

            tracing::trace!(epoch, train_loss, "epoch complete");
            tokio::task::yield_now().await;
        }

        let (network, best_validation_loss) = match best {
            Some((loss, snapshot)) => (snapshot, Some(loss)),
            None => (network, None),
        };

        Ok(NeuralPredictor {
            network,
            report: TrainingReport {
                epochs: self.config.epochs,
                samples: train.len(),
                validation_samples: validation.len(),
                final_train_loss,
                best_validation_loss,
                trained_at: Utc::now(),
            },
        })
    }
}

#[async_trait]
impl ModelTrainer for NeuralTrainer {
    async fn train(&self, set: &TrainingSet) -> Result<Arc<dyn PricePredictor>> {
        let model = self.fit(set).await?;
        Ok(Arc::new(model))
    }

    fn name(&self) -> &str {
        "neural_mlp"
    }
}
