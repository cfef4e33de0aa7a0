//! Confidence from recent error and volatility

use crate::stats;

/// Score returned when fewer than two actuals are available
pub const DEFAULT_CONFIDENCE: u8 = 75;
/// Error assumed when no prediction pairs with a non-zero actual
const FALLBACK_MAPE: f64 = 10.0;
const MIN_CONFIDENCE: f64 = 50.0;
const MAX_CONFIDENCE: f64 = 95.0;
const MAX_VOLATILITY_PENALTY: f64 = 15.0;

/// `round(clamp(100 - MAPE - min(volatility / 2, 15), 50, 95))`
pub fn confidence_score(predictions: &[f64], actuals: &[f64], volatility: f64) -> u8 {
    if actuals.len() < 2 {
        return DEFAULT_CONFIDENCE;
    }

    let mape = stats::mape(predictions, actuals).unwrap_or(FALLBACK_MAPE);
    let penalty = (volatility * 0.5).min(MAX_VOLATILITY_PENALTY);
    let raw = 100.0 - mape - penalty;

    let score = if raw.is_nan() {
        MIN_CONFIDENCE
    } else {
        raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    };
    score.round() as u8
}
