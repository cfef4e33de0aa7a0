//! Crop Price Forecasting Engine
//!
//! Turns a commodity's price history into a multi-day forecast with a trend
//! label, a confidence score and uncertainty bands.
//!
//! ## Architecture
//!
//! ```text
//! PriceSeries → Normalizer → SequenceBuilder → Predictor (cached per commodity)
//!                                                  ↓
//!                                          rollout → denormalize
//!                                                  ↓
//!                          Seasonal → Momentum → Confidence + Bands → Forecast
//! ```

pub mod adjust;
pub mod config;
pub mod engine;
pub mod error;
pub mod ml;
pub mod scoring;
pub mod stats;
pub mod testing;
pub mod types;

pub use engine::ForecastEngine;
pub use error::{ForecastError, Result};

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod integration_tests;
