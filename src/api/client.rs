//! Yahoo Finance chart API client implementation

use super::types::{ChartResponse, Symbol};
use crate::data::DailyBar;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use tracing::{debug, info};

/// Client for fetching daily stock bars from the Yahoo Finance chart API
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooClient {
    /// Create a new client against the public endpoint
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
        }
    }

    /// Create a client with a custom base URL (for tests or mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch one daily OHLCV bar per trading day in `[start, end]`.
    ///
    /// # Arguments
    /// * `symbol` - Stock ticker (e.g., "AAPL")
    /// * `start` - First date of the range, inclusive
    /// * `end` - Last date of the range, inclusive
    ///
    /// Days where the venue reports incomplete data are skipped. Provider
    /// errors (unknown symbol, malformed range) abort with the error the
    /// API reports.
    pub async fn get_daily_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let midnight = NaiveTime::MIN;
        let period1 = start.and_time(midnight).and_utc().timestamp();
        let period2 = end
            .succ_opt()
            .context("End date out of range")?
            .and_time(midnight)
            .and_utc()
            .timestamp();

        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            symbol.as_ref(),
            period1,
            period2
        );

        debug!("Fetching daily bars from: {}", url);

        let response: ChartResponse = self
            .client
            .get(&url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .context("Failed to send request")?
            .json()
            .await
            .context("Failed to parse response")?;

        let bars = bars_from_response(response, symbol)?;

        info!(
            "Fetched {} daily bars for {} ({} to {})",
            bars.len(),
            symbol,
            start,
            end
        );

        Ok(bars)
    }
}

/// Convert a chart response into ordered daily bars, skipping null rows
fn bars_from_response(response: ChartResponse, symbol: &Symbol) -> Result<Vec<DailyBar>> {
    if let Some(error) = response.chart.error {
        anyhow::bail!("API error for {}: {} - {}", symbol, error.code, error.description);
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .with_context(|| format!("No chart data returned for {}", symbol))?;

    let timestamps = result
        .timestamp
        .with_context(|| format!("No timestamps returned for {}", symbol))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .with_context(|| format!("No quote data returned for {}", symbol))?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );

        if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields {
            let date = DateTime::from_timestamp(ts, 0)
                .with_context(|| format!("Invalid timestamp {} for {}", ts, symbol))?
                .date_naive();

            bars.push(DailyBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Chart, ChartResult, Indicators, Quote};

    fn sample_response() -> ChartResponse {
        ChartResponse {
            chart: Chart {
                result: Some(vec![ChartResult {
                    // 2024-05-13 and 2024-05-14, 13:30 UTC session opens
                    timestamp: Some(vec![1_715_607_000, 1_715_693_400, 1_715_779_800]),
                    indicators: Indicators {
                        quote: vec![Quote {
                            open: vec![Some(185.0), None, Some(187.5)],
                            high: vec![Some(187.1), Some(188.0), Some(190.0)],
                            low: vec![Some(184.6), Some(185.2), Some(187.0)],
                            close: vec![Some(186.3), Some(187.4), Some(189.7)],
                            volume: vec![Some(70_000_000.0), Some(52_000_000.0), Some(64_000_000.0)],
                        }],
                    },
                }]),
                error: None,
            },
        }
    }

    #[test]
    fn test_null_rows_are_skipped() {
        let bars = bars_from_response(sample_response(), &Symbol::aapl()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert_eq!(bars[1].close, 189.7);
    }

    #[test]
    fn test_provider_error_propagates() {
        let response = ChartResponse {
            chart: Chart {
                result: None,
                error: Some(crate::api::types::ChartError {
                    code: "Not Found".to_string(),
                    description: "No data found, symbol may be delisted".to_string(),
                }),
            },
        };

        let err = bars_from_response(response, &Symbol::new("NOSUCH")).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }
}
