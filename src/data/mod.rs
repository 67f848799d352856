//! Data structures and preprocessing module
//!
//! Provides the daily bar record and ML dataset types.

mod bar;
mod dataset;

pub use bar::{load_bars_csv, save_bars_csv, DailyBar};
pub use dataset::{Dataset, Split};
