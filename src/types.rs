//! Core types shared across the forecasting pipeline

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest forecast horizon accepted, in days
pub const MIN_HORIZON_DAYS: usize = 7;
/// Longest forecast horizon accepted, in days
pub const MAX_HORIZON_DAYS: usize = 30;

/// One observation in a price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// `None` marks a missing observation
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price: Some(price) }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, price: None }
    }
}

/// Chronologically ordered price history for one commodity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Build a daily series ending the day before `end`
    pub fn daily(end: NaiveDate, prices: &[f64]) -> Self {
        let start = end - chrono::Duration::days(prices.len() as i64);
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(start + chrono::Duration::days(i as i64), *p))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Defined prices in chronological order
    pub fn valid_prices(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.price).collect()
    }

    /// Reject NaN, infinite or negative prices
    pub fn validate(&self) -> Result<()> {
        for point in &self.points {
            if let Some(price) = point.price {
                if !price.is_finite() {
                    return Err(ForecastError::Validation(format!(
                        "non-finite price on {}",
                        point.date
                    )));
                }
                if price < 0.0 {
                    return Err(ForecastError::Validation(format!(
                        "negative price {} on {}",
                        price, point.date
                    )));
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Commodity category, selects the seasonal multiplier table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Cereals,
    CashCrops,
    Vegetables,
    Oilseeds,
    /// Any label outside the known set
    Other(String),
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Cereals => "Cereals",
            Category::CashCrops => "Cash Crops",
            Category::Vegetables => "Vegetables",
            Category::Oilseeds => "Oilseeds",
            Category::Other(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "cereals" => Category::Cereals,
            "cash crops" | "cash_crops" | "cashcrops" => Category::CashCrops,
            "vegetables" => Category::Vegetables,
            "oilseeds" => Category::Oilseeds,
            _ => Category::Other(label.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from(label.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Stable,
}

/// Catalog entry for a tradable crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub current_price: Decimal,
    /// Catalog trend label, only used when history is too short
    pub trend: TrendDirection,
}

/// Caller-supplied forecast knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameters {
    pub horizon_days: usize,
    pub seasonal_weight: f64,
    pub trend_weight: f64,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            horizon_days: 14,
            seasonal_weight: 0.5,
            trend_weight: 0.5,
        }
    }
}

impl ForecastParameters {
    /// Build parameters from slider-style input, forcing every field into range
    pub fn clamped(horizon_days: usize, seasonal_weight: f64, trend_weight: f64) -> Self {
        Self {
            horizon_days: horizon_days.clamp(MIN_HORIZON_DAYS, MAX_HORIZON_DAYS),
            seasonal_weight: clamp_weight(seasonal_weight),
            trend_weight: clamp_weight(trend_weight),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&self.horizon_days) {
            return Err(ForecastError::Validation(format!(
                "horizon {} outside {}..={}",
                self.horizon_days, MIN_HORIZON_DAYS, MAX_HORIZON_DAYS
            )));
        }
        check_weight("seasonal_weight", self.seasonal_weight)?;
        check_weight("trend_weight", self.trend_weight)?;
        Ok(())
    }
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if weight.is_nan() || !(0.0..=1.0).contains(&weight) {
        return Err(ForecastError::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, weight
        )));
    }
    Ok(())
}

/// Which branch of the engine produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastPath {
    /// Fewer valid points than a window plus two
    InsufficientData,
    /// Too few training pairs, or the model could not be trained
    LowTrainingData,
    FullPipeline,
}

/// Forecast returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: Vec<f64>,
    /// 0-100
    pub confidence: u8,
    pub trend: TrendDirection,
    /// Percent
    pub volatility: f64,
    pub moving_average: Vec<f64>,
    pub upper_band: Vec<f64>,
    pub lower_band: Vec<f64>,
    pub factors: Vec<String>,
    pub path: ForecastPath,
}

impl Forecast {
    pub fn horizon(&self) -> usize {
        self.predictions.len()
    }

    pub fn mean_prediction(&self) -> f64 {
        crate::stats::mean(&self.predictions)
    }

    /// Mean prediction relative to `last_price`, in percent
    pub fn expected_change_pct(&self, last_price: f64) -> f64 {
        if last_price == 0.0 || self.predictions.is_empty() {
            return 0.0;
        }
        (self.mean_prediction() - last_price) / last_price * 100.0
    }

    /// Trading advice derived from trend and confidence
    pub fn recommendation(&self) -> Recommendation {
        match self.trend {
            TrendDirection::Up if self.confidence > 80 => Recommendation::Buy,
            TrendDirection::Down if self.confidence > 75 => Recommendation::Sell,
            _ => Recommendation::Hold,
        }
    }
}

/// Advisory shown next to a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    pub fn advice(&self) -> &'static str {
        match self {
            Recommendation::Buy => {
                "Strong Buy Signal - Prices expected to rise. Consider holding inventory."
            }
            Recommendation::Sell => {
                "Sell Signal - Prices may decline. Consider selling current stock."
            }
            Recommendation::Hold => {
                "Hold Position - Market conditions are uncertain. Monitor closely."
            }
        }
    }
}
