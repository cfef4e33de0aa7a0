//! Human-readable notes attached to a forecast

use crate::config::EngineConfig;
use crate::types::ForecastParameters;

pub const NEURAL_REGRESSION: &str = "Neural network regression analysis";
pub const SLIDING_WINDOW: &str = "7-day sliding window pattern recognition";
pub const SEASONAL_APPLIED: &str = "Seasonal adjustment factors applied";
pub const MOMENTUM_WEIGHTED: &str = "Historical trend momentum weighted";
pub const INSUFFICIENT_DATA: &str = "Insufficient historical data - using trend extrapolation";
pub const LIMITED_TRAINING_DATA: &str = "Limited training data - predictions may be less accurate";
pub const MODEL_FAILED: &str = "Model training failed - falling back to last known price";

pub fn data_points(n: usize) -> String {
    format!("{} historical data points processed", n)
}

pub fn high_volatility(volatility: f64) -> String {
    format!("High volatility detected ({:.1}%)", volatility)
}

/// Factors for a forecast produced by the trained model
pub fn full_pipeline(
    points: usize,
    volatility: f64,
    params: &ForecastParameters,
    config: &EngineConfig,
) -> Vec<String> {
    let mut factors = vec![
        NEURAL_REGRESSION.to_string(),
        SLIDING_WINDOW.to_string(),
        data_points(points),
    ];

    if volatility > config.high_volatility_threshold {
        factors.push(high_volatility(volatility));
    }
    if params.seasonal_weight > config.weight_note_threshold {
        factors.push(SEASONAL_APPLIED.to_string());
    }
    if params.trend_weight > config.weight_note_threshold {
        factors.push(MOMENTUM_WEIGHTED.to_string());
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_factors_only() {
        let params = ForecastParameters {
            horizon_days: 7,
            seasonal_weight: 0.3,
            trend_weight: 0.0,
        };
        let factors = full_pipeline(42, 3.0, &params, &EngineConfig::default());
        assert_eq!(
            factors,
            vec![NEURAL_REGRESSION, SLIDING_WINDOW, "42 historical data points processed"]
        );
    }

    #[test]
    fn test_all_factors() {
        let factors = full_pipeline(40, 14.26, &ForecastParameters::default(), &EngineConfig::default());
        assert_eq!(factors.len(), 6);
        assert_eq!(factors[3], "High volatility detected (14.3%)");
        assert_eq!(factors[4], SEASONAL_APPLIED);
        assert_eq!(factors[5], MOMENTUM_WEIGHTED);
    }
}
