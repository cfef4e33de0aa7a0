//! Fixtures for tests and demos

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{Category, Commodity, PriceSeries, TrendDirection};

/// Fixed anchor date so fixtures do not depend on the clock
pub fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default()
}

pub fn commodity(id: &str, category: Category, current_price: Decimal, trend: TrendDirection) -> Commodity {
    Commodity {
        id: id.to_string(),
        name: id.to_string(),
        category,
        current_price,
        trend,
    }
}

/// Cereal commodity with a stable catalog trend
pub fn cereal(id: &str, current_price: Decimal) -> Commodity {
    commodity(id, Category::Cereals, current_price, TrendDirection::Stable)
}

/// Daily series ending the day before [`anchor_date`]
pub fn daily_series(prices: &[f64]) -> PriceSeries {
    PriceSeries::daily(anchor_date(), prices)
}

pub fn constant_prices(price: f64, n: usize) -> Vec<f64> {
    vec![price; n]
}

/// Alternates `base * (1 + swing)` and `base * (1 - swing)`
pub fn oscillating_prices(base: f64, swing: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| if i % 2 == 0 { base * (1.0 + swing) } else { base * (1.0 - swing) })
        .collect()
}

/// Straight line from `start` rising by `step` per day
pub fn trending_prices(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}
