//! Yahoo Finance chart API client module
//!
//! Provides an async client for fetching historical daily OHLCV bars
//! for a single stock ticker.

mod client;
mod types;

pub use client::YahooClient;
pub use types::{ChartResponse, Symbol};
