//! Reliability scoring for a finished forecast

pub mod bands;
pub mod confidence;

pub use bands::{fixed_bands, volatility_bands, Bands};
pub use confidence::{confidence_score, DEFAULT_CONFIDENCE};
