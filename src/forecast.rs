//! Short-horizon extrapolation
//!
//! Builds synthetic feature rows for the calendar days following the
//! last observed bar. Every projected row reuses the final bar's values
//! and the final moving averages, so a trained model necessarily returns
//! the same predicted price for each day of the horizon. That collapse
//! is a documented limitation of the projection, not of the model.

use crate::data::DailyBar;
use crate::features::{sma, FeatureEngine};
use anyhow::{ensure, Result};
use chrono::{Duration, NaiveDate};

/// Synthetic feature rows for upcoming calendar days
#[derive(Debug, Clone)]
pub struct FutureFeatures {
    pub feature_names: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

/// The `horizon` consecutive calendar days after `last`.
///
/// No trading-day calendar is applied; weekends and market holidays are
/// included.
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as i64)
        .map(|i| last + Duration::days(i))
        .collect()
}

/// Project the feature set `horizon` calendar days past the end of the
/// bar series.
///
/// Each row carries: previous close = last close, high-low and
/// open-close of the last bar, last volume, and the MA10/MA50 of the
/// full series at its final position. Requires at least 50 bars so the
/// 50-day average is defined.
pub fn project_forward(bars: &[DailyBar], horizon: usize) -> Result<FutureFeatures> {
    ensure!(
        bars.len() >= 50,
        "Need at least 50 bars to project forward, got {}",
        bars.len()
    );

    let last = bars.last().expect("bars is non-empty");
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ma10 = *sma(&closes, 10).last().expect("series is non-empty");
    let ma50 = *sma(&closes, 50).last().expect("series is non-empty");

    let row = vec![
        last.close,
        last.high - last.low,
        last.open - last.close,
        last.volume,
        ma10,
        ma50,
    ];

    Ok(FutureFeatures {
        feature_names: FeatureEngine::new().feature_names(),
        dates: future_dates(last.date, horizon),
        rows: vec![row; horizon],
    })
}
