//! Post-model adjustments
//!
//! Applied to denormalized predictions in a fixed order: seasonal multipliers
//! first, then historical momentum. A zero weight makes either step a no-op.

pub mod momentum;
pub mod seasonal;

pub use momentum::{apply_trend, average_daily_change};
pub use seasonal::{apply_seasonal, seasonal_multipliers};
