//! Seasonal adjustment by commodity category

use crate::types::Category;

const CEREALS: [f64; 12] = [1.02, 1.01, 0.98, 0.97, 0.96, 0.95, 0.98, 1.00, 1.02, 1.04, 1.03, 1.02];
const CASH_CROPS: [f64; 12] = [0.98, 0.97, 0.99, 1.01, 1.02, 1.03, 1.02, 1.00, 0.98, 0.97, 0.98, 0.99];
const VEGETABLES: [f64; 12] = [1.15, 1.10, 1.00, 0.90, 0.85, 0.88, 0.95, 1.00, 1.05, 1.10, 1.12, 1.15];
const OILSEEDS: [f64; 12] = [1.01, 1.00, 0.99, 0.98, 0.97, 0.98, 1.00, 1.02, 1.03, 1.02, 1.01, 1.01];

/// Monthly multipliers, January first. Unknown categories use the cereal table.
pub fn seasonal_multipliers(category: &Category) -> &'static [f64; 12] {
    match category {
        Category::Cereals => &CEREALS,
        Category::CashCrops => &CASH_CROPS,
        Category::Vegetables => &VEGETABLES,
        Category::Oilseeds => &OILSEEDS,
        Category::Other(_) => &CEREALS,
    }
}

/// Blend raw predictions with their seasonally scaled counterparts.
///
/// Step `i` uses the multiplier of month `(month0 + i) % 12`; the result is
/// `round(raw * (1 - w) + round(raw * m) * w)`.
pub fn apply_seasonal(predictions: &[f64], month0: u32, category: &Category, weight: f64) -> Vec<f64> {
    if weight <= 0.0 {
        return predictions.to_vec();
    }

    let table = seasonal_multipliers(category);
    predictions
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let multiplier = table[(month0 as usize + i) % 12];
            let seasonal = (raw * multiplier).round();
            (raw * (1.0 - weight) + seasonal * weight).round()
        })
        .collect()
}
