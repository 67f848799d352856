//! # Stock Forecast - Daily Price Prediction with Random Forests
//!
//! This library fetches historical daily OHLCV data for a stock ticker,
//! derives a small set of engineered features, trains a Random Forest
//! regressor on the closing price, and extrapolates predictions over a
//! short calendar-day horizon.
//!
//! ## Modules
//!
//! - `api` - Yahoo Finance chart API client for fetching daily bars
//! - `data` - Daily bar records and ML dataset structures
//! - `features` - Feature engineering over the bar series
//! - `models` - Decision Tree and Random Forest regressors
//! - `forecast` - Synthetic future feature rows for extrapolation
//! - `plot` - Actual-vs-predicted scatter charts

pub mod api;
pub mod data;
pub mod features;
pub mod forecast;
pub mod models;
pub mod plot;

pub use api::YahooClient;
pub use data::{DailyBar, Dataset};
pub use features::FeatureEngine;
pub use models::{DecisionTree, RandomForest};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{Symbol, YahooClient};
    pub use crate::data::{DailyBar, Dataset, Split};
    pub use crate::features::FeatureEngine;
    pub use crate::forecast::{future_dates, project_forward, FutureFeatures};
    pub use crate::models::{DecisionTree, ForestConfig, RandomForest, TreeConfig};
}
