//! Degraded outputs for short histories and failed models

use rust_decimal::prelude::ToPrimitive;

use super::factors;
use crate::config::EngineConfig;
use crate::scoring::fixed_bands;
use crate::stats;
use crate::types::{Commodity, Forecast, ForecastPath, TrendDirection};

pub const INSUFFICIENT_DATA_CONFIDENCE: u8 = 70;
pub const LOW_TRAINING_DATA_CONFIDENCE: u8 = 65;
/// Volatility reported when there is too little history to measure it
pub const ASSUMED_VOLATILITY: f64 = 5.0;

const INSUFFICIENT_DATA_BAND: f64 = 0.05;
const LOW_TRAINING_DATA_BAND: f64 = 0.08;

fn daily_multiplier(trend: TrendDirection) -> f64 {
    match trend {
        TrendDirection::Up => 1.005,
        TrendDirection::Down => 0.995,
        TrendDirection::Stable => 1.0,
    }
}

/// Compound the catalog trend from the last known price
pub fn insufficient_data(
    prices: &[f64],
    commodity: &Commodity,
    horizon: usize,
    config: &EngineConfig,
) -> Forecast {
    let base = prices
        .last()
        .copied()
        .or_else(|| commodity.current_price.to_f64())
        .unwrap_or(0.0)
        .max(0.0);
    let multiplier = daily_multiplier(commodity.trend);

    let predictions: Vec<f64> = (1..=horizon)
        .map(|step| (base * multiplier.powi(step as i32)).round())
        .collect();
    let bands = fixed_bands(&predictions, INSUFFICIENT_DATA_BAND);

    Forecast {
        predictions,
        confidence: INSUFFICIENT_DATA_CONFIDENCE,
        trend: commodity.trend,
        volatility: ASSUMED_VOLATILITY,
        moving_average: stats::tail(prices, config.history_tail).to_vec(),
        upper_band: bands.upper,
        lower_band: bands.lower,
        factors: vec![factors::INSUFFICIENT_DATA.to_string()],
        path: ForecastPath::InsufficientData,
    }
}

/// Repeat the last price flat across the horizon
pub fn low_training_data(prices: &[f64], horizon: usize, config: &EngineConfig) -> Forecast {
    let last = prices.last().copied().unwrap_or(0.0).round();
    let predictions = vec![last; horizon];
    let bands = fixed_bands(&predictions, LOW_TRAINING_DATA_BAND);

    Forecast {
        predictions,
        confidence: LOW_TRAINING_DATA_CONFIDENCE,
        trend: TrendDirection::Stable,
        volatility: stats::volatility(prices),
        moving_average: stats::tail(prices, config.history_tail).to_vec(),
        upper_band: bands.upper,
        lower_band: bands.lower,
        factors: vec![factors::LIMITED_TRAINING_DATA.to_string()],
        path: ForecastPath::LowTrainingData,
    }
}

/// Low-training-data output annotated with the model failure
pub fn model_failed(prices: &[f64], horizon: usize, config: &EngineConfig) -> Forecast {
    let mut forecast = low_training_data(prices, horizon, config);
    forecast.factors.push(factors::MODEL_FAILED.to_string());
    forecast
}
