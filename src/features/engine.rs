//! Feature engineering engine

use super::indicators::{lag, sma};
use crate::data::{DailyBar, Dataset};

/// Feature types that can be computed per bar
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// Previous day's closing price (one-step lag)
    PrevClose,
    /// Intraday range: high minus low
    HighLow,
    /// Open minus close of the same day
    OpenClose,
    /// Traded volume, passed through unchanged
    Volume,
    /// Simple moving average of close over a trailing window
    SMA(usize),
}

impl Feature {
    pub fn name(&self) -> String {
        match self {
            Feature::PrevClose => "prev_close".to_string(),
            Feature::HighLow => "high_low".to_string(),
            Feature::OpenClose => "open_close".to_string(),
            Feature::Volume => "volume".to_string(),
            Feature::SMA(p) => format!("ma_{}", p),
        }
    }

    /// Rows of trailing history needed before this feature is defined
    fn lookback(&self) -> usize {
        match self {
            Feature::PrevClose => 1,
            Feature::SMA(p) => p.saturating_sub(1),
            _ => 0,
        }
    }
}

/// Turns an ordered daily bar series into a training dataset.
///
/// The target of each row is that day's closing price. Rows where any
/// feature is undefined (insufficient trailing history) are dropped, so
/// with the default feature set the first 49 rows of a clean series are
/// excluded by the 50-day moving average.
pub struct FeatureEngine {
    features: Vec<Feature>,
}

impl FeatureEngine {
    /// Create an engine with the default feature set
    pub fn new() -> Self {
        Self {
            features: Self::default_features(),
        }
    }

    /// Create an engine with custom features
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// The six default features: previous close, high-low range,
    /// open-close delta, volume, MA10 and MA50
    pub fn default_features() -> Vec<Feature> {
        vec![
            Feature::PrevClose,
            Feature::HighLow,
            Feature::OpenClose,
            Feature::Volume,
            Feature::SMA(10),
            Feature::SMA(50),
        ]
    }

    /// Feature names in column order
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Generate a dataset from bars
    pub fn generate(&self, bars: &[DailyBar]) -> Dataset {
        let n = bars.len();
        let feature_names = self.feature_names();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let columns: Vec<Vec<f64>> = self
            .features
            .iter()
            .map(|f| self.compute_feature(f, bars, &closes))
            .collect();

        let mut dataset = Dataset::new(feature_names);
        let lookback = self.required_lookback();

        for i in lookback..n {
            let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();

            if row.iter().any(|v| v.is_nan()) {
                continue;
            }

            dataset.add_sample(row, closes[i], bars[i].date);
        }

        dataset
    }

    /// Compute one feature column over the full series
    fn compute_feature(&self, feature: &Feature, bars: &[DailyBar], closes: &[f64]) -> Vec<f64> {
        match feature {
            Feature::PrevClose => lag(closes, 1),
            Feature::HighLow => bars.iter().map(|b| b.high - b.low).collect(),
            Feature::OpenClose => bars.iter().map(|b| b.open - b.close).collect(),
            Feature::Volume => bars.iter().map(|b| b.volume).collect(),
            Feature::SMA(period) => sma(closes, *period),
        }
    }

    /// Rows dropped from the head of the series
    pub fn required_lookback(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.lookback())
            .max()
            .unwrap_or(0)
    }
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn synthetic_bars(n: usize) -> Vec<DailyBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        (0..n)
            .map(|i| {
                let price = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.05;
                DailyBar::new(
                    start + chrono::Duration::days(i as i64),
                    price,
                    price + 1.5,
                    price - 1.0,
                    price + 0.5,
                    1_000_000.0 + i as f64 * 100.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_drops_exactly_first_49_rows() {
        let bars = synthetic_bars(120);
        let dataset = FeatureEngine::new().generate(&bars);

        assert_eq!(dataset.n_samples(), 120 - 49);
        assert_eq!(dataset.dates[0], bars[49].date);
        assert_eq!(*dataset.dates.last().unwrap(), bars[119].date);
    }

    #[test]
    fn test_prev_close_matches_prior_row() {
        let bars = synthetic_bars(60);
        let dataset = FeatureEngine::new().generate(&bars);

        // prev_close is column 0
        for (i, row) in dataset.features.iter().enumerate() {
            assert_eq!(row[0], bars[49 + i - 1].close);
        }
    }

    #[test]
    fn test_high_low_non_negative() {
        let bars = synthetic_bars(60);
        let dataset = FeatureEngine::new().generate(&bars);

        for row in &dataset.features {
            assert!(row[1] >= 0.0);
        }
    }

    #[test]
    fn test_no_nan_survives_drop() {
        let bars = synthetic_bars(80);
        let dataset = FeatureEngine::new().generate(&bars);

        for row in &dataset.features {
            assert!(row.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_moving_average_values() {
        let bars = synthetic_bars(55);
        let dataset = FeatureEngine::new().generate(&bars);

        // First retained row is index 49: MA50 spans rows 0..=49
        let expected_ma50: f64 =
            bars[..50].iter().map(|b| b.close).sum::<f64>() / 50.0;
        let expected_ma10: f64 =
            bars[40..50].iter().map(|b| b.close).sum::<f64>() / 10.0;

        let row = &dataset.features[0];
        assert!((row[4] - expected_ma10).abs() < 1e-9);
        assert!((row[5] - expected_ma50).abs() < 1e-9);
    }

    #[test]
    fn test_label_is_same_day_close() {
        let bars = synthetic_bars(52);
        let dataset = FeatureEngine::new().generate(&bars);

        assert_eq!(dataset.labels[0], bars[49].close);
        assert_eq!(*dataset.labels.last().unwrap(), bars[51].close);
    }

    #[test]
    fn test_custom_feature_set_shrinks_lookback() {
        let engine = FeatureEngine::with_features(vec![Feature::PrevClose, Feature::SMA(10)]);
        assert_eq!(engine.required_lookback(), 9);

        let bars = synthetic_bars(20);
        let dataset = engine.generate(&bars);

        assert_eq!(dataset.n_samples(), 11);
        assert_eq!(dataset.feature_names, ["prev_close", "ma_10"]);
    }

    #[test]
    fn test_series_shorter_than_window_is_empty() {
        let bars = synthetic_bars(30);
        let dataset = FeatureEngine::new().generate(&bars);

        assert_eq!(dataset.n_samples(), 0);
    }
}
