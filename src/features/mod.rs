//! Feature engineering module
//!
//! Derives per-day numeric features from the ordered bar series.

mod engine;
mod indicators;

pub use engine::{Feature, FeatureEngine};
pub use indicators::{lag, sma};
