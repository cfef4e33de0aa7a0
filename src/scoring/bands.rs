//! Upper and lower uncertainty bands

/// Bands parallel to a prediction sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bands {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bollinger-style bands: `p * m` and `p / m` with `m = 1 + 2 * volatility / 100`.
/// Width depends on volatility only, not on how far out the step is.
pub fn volatility_bands(predictions: &[f64], volatility: f64) -> Bands {
    let volatility = if volatility.is_finite() { volatility.max(0.0) } else { 0.0 };
    let multiplier = 1.0 + (volatility / 100.0) * 2.0;

    Bands {
        upper: predictions.iter().map(|p| (p * multiplier).round()).collect(),
        lower: predictions.iter().map(|p| (p / multiplier).round()).collect(),
    }
}

/// Symmetric percentage bands used by the fallback paths
pub fn fixed_bands(predictions: &[f64], pct: f64) -> Bands {
    Bands {
        upper: predictions.iter().map(|p| (p * (1.0 + pct)).round()).collect(),
        lower: predictions.iter().map(|p| (p * (1.0 - pct)).round()).collect(),
    }
}
