//! Rolling-window primitives over price series
//!
//! All functions return one value per input row; positions with
//! insufficient trailing history are `NAN`.

/// Simple Moving Average over a trailing window ending at the current
/// row inclusive
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut result = vec![f64::NAN; period - 1];

    for i in (period - 1)..values.len() {
        let sum: f64 = values[(i + 1 - period)..=i].iter().sum();
        result.push(sum / period as f64);
    }

    result
}

/// Shift a series forward by `period` rows (row i takes the value of
/// row i - period)
pub fn lag(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len().min(period)];

    if values.len() > period {
        result.extend_from_slice(&values[..values.len() - period]);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_window() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_eq!(result[2], 2.0);
        assert_eq!(result[3], 3.0);
        assert_eq!(result[4], 4.0);
    }

    #[test]
    fn test_sma_short_series() {
        let values = vec![1.0, 2.0];
        let result = sma(&values, 5);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_lag_one() {
        let values = vec![10.0, 20.0, 30.0];
        let result = lag(&values, 1);

        assert!(result[0].is_nan());
        assert_eq!(result[1], 10.0);
        assert_eq!(result[2], 20.0);
    }

    #[test]
    fn test_lag_longer_than_series() {
        let values = vec![10.0, 20.0];
        let result = lag(&values, 5);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
