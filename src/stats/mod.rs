//! Series statistics
//!
//! Plain functions over price slices. All of them fail closed: degenerate
//! input (too few points, zero mean, zero variance) yields 0 rather than a
//! non-finite value.

mod correlation;

pub use correlation::{correlation, correlation_matrix, CorrelationCell, CorrelationStrength};

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation as a percentage of the mean
pub fn volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let mean = mean(prices);
    if mean == 0.0 {
        return 0.0;
    }

    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    let pct = variance.sqrt() / mean * 100.0;

    if pct.is_finite() {
        pct.abs()
    } else {
        0.0
    }
}

/// Mean absolute percentage error over paired positions, skipping zero actuals
pub fn mape(predictions: &[f64], actuals: &[f64]) -> Option<f64> {
    let (total, count) = predictions
        .iter()
        .zip(actuals)
        .filter(|(_, a)| **a != 0.0)
        .fold((0.0, 0usize), |(sum, n), (p, a)| {
            (sum + ((a - p) / a).abs(), n + 1)
        });

    if count == 0 {
        None
    } else {
        Some(total / count as f64 * 100.0)
    }
}

/// Trailing moving average, rounded; the first entries average a shorter prefix
pub fn trailing_moving_average(prices: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..prices.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&prices[start..=i]).round()
        })
        .collect()
}

/// Last `n` values of a slice
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn test_volatility_constant_series() {
        let prices = vec![2000.0; 10];
        assert_eq!(volatility(&prices), 0.0);
    }

    #[test]
    fn test_volatility_guards() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[100.0]), 0.0);
        assert_eq!(volatility(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_volatility_known_value() {
        // mean 100, population std dev 10
        let prices = vec![90.0, 110.0, 90.0, 110.0];
        assert!((volatility(&prices) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_high_volatility_oscillation() {
        let prices: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 1200.0 } else { 800.0 })
            .collect();
        assert!(volatility(&prices) > 10.0);
    }

    #[test]
    fn test_mape_skips_zero_actuals() {
        let predictions = vec![110.0, 50.0, 90.0];
        let actuals = vec![100.0, 0.0, 100.0];
        let err = mape(&predictions, &actuals).unwrap();
        assert!((err - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_mape_no_pairs() {
        assert_eq!(mape(&[1.0, 2.0], &[0.0, 0.0]), None);
        assert_eq!(mape(&[], &[1.0]), None);
    }

    #[test]
    fn test_trailing_moving_average() {
        let prices = vec![10.0, 20.0, 30.0, 40.0];
        let ma = trailing_moving_average(&prices, 3);
        assert_eq!(ma, vec![10.0, 15.0, 20.0, 30.0]);
    }

    #[test]
    fn test_trailing_moving_average_rounds() {
        let ma = trailing_moving_average(&[1.0, 2.0], 7);
        assert_eq!(ma, vec![1.0, 2.0]); // 1.5 rounds away from zero
    }

    #[test]
    fn test_tail() {
        let values = vec![1.0, 2.0, 3.0];
        assert_eq!(tail(&values, 2), &[2.0, 3.0]);
        assert_eq!(tail(&values, 10), &[1.0, 2.0, 3.0]);
    }
}
