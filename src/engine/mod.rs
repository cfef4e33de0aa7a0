//! Forecast orchestration
//!
//! `ForecastEngine` turns a price history into a [`Forecast`]. Each request
//! takes one of three paths depending on how much history is available:
//!
//! - fewer than a window plus two valid prices: extrapolate the catalog trend
//! - fewer than three training pairs: repeat the last price
//! - otherwise: train (or reuse) the commodity's model, roll it out, then apply
//!   seasonal and momentum adjustments and score the result
//!
//! Model failures never reach the caller. They are logged and answered with the
//! flat fallback. Only invalid input is returned as an error; an invalid engine
//! configuration is rejected when the engine is built.

mod cache;
pub mod factors;
pub mod fallback;


pub use cache::{CacheOutcome, ModelCache, TrainedModel};
pub use crate::stats::{correlation, correlation_matrix};

use chrono::{Datelike, NaiveDate, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adjust::{apply_seasonal, apply_trend, average_daily_change};
use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};
use crate::ml::{build_sequences, ModelTrainer, NeuralTrainer, Normalizer, TrainingSet, WINDOW_SIZE};
use crate::scoring::{confidence_score, volatility_bands};
use crate::stats;
use crate::types::{Commodity, Forecast, ForecastParameters, ForecastPath, PriceSeries, TrendDirection};

/// Valid prices needed before any training is attempted
pub const MIN_VALID_POINTS: usize = WINDOW_SIZE + 2;
/// Training pairs needed for the full pipeline
pub const MIN_TRAINING_PAIRS: usize = 3;

/// Classify the move from `last_price` to `mean_prediction`
pub fn classify_trend(mean_prediction: f64, last_price: f64, threshold_pct: f64) -> TrendDirection {
    if last_price == 0.0 {
        return TrendDirection::Stable;
    }

    let change_pct = (mean_prediction - last_price) / last_price * 100.0;
    if change_pct > threshold_pct {
        TrendDirection::Up
    } else if change_pct < -threshold_pct {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

/// Per-commodity price forecaster with an owned model cache
pub struct ForecastEngine {
    config: EngineConfig,
    trainer: Arc<dyn ModelTrainer>,
    cache: ModelCache,
    training_runs: AtomicU64,
}

impl ForecastEngine {
    /// Engine backed by the neural trainer
    pub fn new(config: EngineConfig) -> Result<Self> {
        let trainer = NeuralTrainer::new(config.training.clone(), config.seed);
        Self::with_trainer(config, Arc::new(trainer))
    }

    /// Fails with `Validation` when `config` is invalid
    pub fn with_trainer(config: EngineConfig, trainer: Arc<dyn ModelTrainer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trainer,
            cache: ModelCache::new(),
            training_runs: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of trainings started since the engine was created
    pub fn training_runs(&self) -> u64 {
        self.training_runs.load(Ordering::SeqCst)
    }

    pub async fn cached_model(&self, commodity_id: &str) -> Option<Arc<TrainedModel>> {
        self.cache.get(commodity_id).await
    }

    /// Drop the cached model for one commodity, or all of them
    pub async fn invalidate(&self, commodity_id: Option<&str>) {
        let dropped = self.cache.invalidate(commodity_id).await;
        info!(
            commodity = commodity_id.unwrap_or("*"),
            dropped,
            "Model cache invalidated"
        );
    }

    /// Forecast with seasonality anchored at today's date (UTC)
    pub async fn forecast(
        &self,
        series: &PriceSeries,
        commodity: &Commodity,
        params: &ForecastParameters,
    ) -> Result<Forecast> {
        self.forecast_at(series, commodity, params, Utc::now().date_naive())
            .await
    }

    /// Forecast with seasonality anchored at `reference_date`
    pub async fn forecast_at(
        &self,
        series: &PriceSeries,
        commodity: &Commodity,
        params: &ForecastParameters,
        reference_date: NaiveDate,
    ) -> Result<Forecast> {
        params.validate()?;
        series.validate()?;

        let prices = series.valid_prices();
        let horizon = params.horizon_days;

        if prices.len() < MIN_VALID_POINTS {
            debug!(commodity = %commodity.id, points = prices.len(), "Insufficient history");
            return Ok(fallback::insufficient_data(&prices, commodity, horizon, &self.config));
        }

        let Some(normalizer) = Normalizer::fit(&prices) else {
            return Ok(fallback::insufficient_data(&prices, commodity, horizon, &self.config));
        };
        let normalized = normalizer.normalize(&prices);
        let set = build_sequences(&normalized, WINDOW_SIZE);

        if set.len() < MIN_TRAINING_PAIRS {
            debug!(commodity = %commodity.id, pairs = set.len(), "Too few training pairs");
            return Ok(fallback::low_training_data(&prices, horizon, &self.config));
        }

        let raw = match self.rollout(&commodity.id, &set, &normalized, horizon).await {
            Ok(raw) => raw,
            // input is already validated, so anything here is the model's fault
            Err(e) => {
                warn!(commodity = %commodity.id, error = %e, "Model failed, using last known price");
                return Ok(fallback::model_failed(&prices, horizon, &self.config));
            }
        };

        let denormalized = normalizer.denormalize(&raw);
        let seasonal = apply_seasonal(
            &denormalized,
            reference_date.month0(),
            &commodity.category,
            params.seasonal_weight,
        );
        let adjusted = apply_trend(&seasonal, average_daily_change(&prices), params.trend_weight);
        let predictions: Vec<f64> = adjusted.iter().map(|p| p.round().max(0.0)).collect();

        Ok(self.assemble(&prices, predictions, params))
    }

    /// Fetch or train the commodity's model and roll it out over `horizon`
    /// normalized steps
    async fn rollout(
        &self,
        commodity_id: &str,
        set: &TrainingSet,
        normalized: &[f64],
        horizon: usize,
    ) -> Result<Vec<f64>> {
        let trainer = self.trainer.clone();
        let runs = &self.training_runs;
        let timeout = self.config.training_timeout();

        let (model, outcome) = self
            .cache
            .get_or_train(commodity_id, move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                info!(
                    commodity = commodity_id,
                    trainer = trainer.name(),
                    samples = set.len(),
                    "Training model"
                );
                match tokio::time::timeout(timeout, trainer.train(set)).await {
                    Ok(result) => result,
                    Err(_) => Err(ForecastError::TrainingTimeout(timeout)),
                }
            })
            .await?;

        match outcome {
            CacheOutcome::Hit => debug!(commodity = commodity_id, model_id = %model.id, "Cache hit"),
            CacheOutcome::Trained | CacheOutcome::TrainedStale => {
                if let Some(report) = model.predictor.report() {
                    info!(
                        commodity = commodity_id,
                        model_id = %model.id,
                        train_loss = report.final_train_loss,
                        val_loss = ?report.best_validation_loss,
                        "Model trained"
                    );
                }
            }
        }

        let window = stats::tail(normalized, model.predictor.window_size());
        model.predictor.forecast_steps(window, horizon)
    }

    fn assemble(&self, prices: &[f64], predictions: Vec<f64>, params: &ForecastParameters) -> Forecast {
        let config = &self.config;
        let volatility = stats::volatility(prices);

        let sample = config.confidence_sample;
        let head = &predictions[..sample.min(predictions.len())];
        let confidence = confidence_score(head, stats::tail(prices, sample), volatility);

        let last = prices.last().copied().unwrap_or(0.0);
        let trend = classify_trend(stats::mean(&predictions), last, config.trend_threshold_pct);
        let bands = volatility_bands(&predictions, volatility);

        Forecast {
            confidence,
            trend,
            volatility,
            moving_average: stats::trailing_moving_average(prices, config.moving_average_window),
            upper_band: bands.upper,
            lower_band: bands.lower,
            factors: factors::full_pipeline(prices.len(), volatility, params, config),
            path: ForecastPath::FullPipeline,
            predictions,
        }
    }
}
