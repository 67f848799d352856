//! Daily OHLCV bar record

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One daily trading summary for a single ticker.
///
/// Bars are immutable once fetched; the provider is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Save bars to a CSV file with a header row
pub fn save_bars_csv(bars: &[DailyBar], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for bar in bars {
        writer.serialize(bar)?;
    }

    writer.flush()?;
    Ok(())
}

/// Load bars from a CSV file written by [`save_bars_csv`]
pub fn load_bars_csv(path: &Path) -> Result<Vec<DailyBar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let bar: DailyBar = record.context("Malformed bar record")?;
        bars.push(bar);
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_round_trip() {
        let bars = vec![
            DailyBar::new(
                NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
                185.0,
                187.1,
                184.6,
                186.3,
                70_000_000.0,
            ),
            DailyBar::new(
                NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
                186.5,
                188.0,
                185.2,
                187.4,
                52_000_000.0,
            ),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");

        save_bars_csv(&bars, &path).unwrap();
        let loaded = load_bars_csv(&path).unwrap();

        assert_eq!(loaded, bars);
    }
}
