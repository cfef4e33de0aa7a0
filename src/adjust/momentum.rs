//! Linear momentum weighting from historical drift

/// `(last - first) / first / n` over the whole history; 0 when undefined
pub fn average_daily_change(prices: &[f64]) -> f64 {
    let (Some(first), Some(last)) = (prices.first(), prices.last()) else {
        return 0.0;
    };
    if prices.len() < 2 || *first == 0.0 {
        return 0.0;
    }

    let change = (last - first) / first / prices.len() as f64;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Scale step `i` by `1 + avg_change * weight * (i + 1)`, rounding each value
pub fn apply_trend(predictions: &[f64], avg_change: f64, weight: f64) -> Vec<f64> {
    if weight <= 0.0 {
        return predictions.to_vec();
    }

    predictions
        .iter()
        .enumerate()
        .map(|(i, p)| (p * (1.0 + avg_change * weight * (i + 1) as f64)).round())
        .collect()
}
