//! Stooq-style benchmark EOD close provider.
//!
//! Fetches the full daily history CSV for a US-listed benchmark symbol
//! (`Date,Open,High,Low,Close,Volume`) through the CORS proxy and keeps
//! rows with a parseable date and a positive close.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use crate::errors::MarketDataError;
use crate::models::EodClose;
use crate::proxy::{fetch_text_with_fallback, proxy_url};

use super::EodSeriesProvider;

const BASE_URL: &str = "https://stooq.com/q/d/l/";
const PROVIDER_ID: &str = "STOOQ";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Benchmark daily close provider.
pub struct StooqEodProvider {
    client: Client,
}

impl StooqEodProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    fn series_url(symbol: &str) -> String {
        format!("{}?s={}.us&i=d", BASE_URL, symbol.to_lowercase())
    }

    /// Parse the daily history CSV, skipping the header and any malformed
    /// rows. The close is the fifth column.
    fn parse_csv(text: &str) -> Vec<EodClose> {
        let mut series: Vec<EodClose> = text
            .trim()
            .lines()
            .skip(1)
            .filter_map(|line| {
                let cols: Vec<&str> = line.split(',').collect();
                let date = NaiveDate::parse_from_str(cols.first()?.trim(), "%Y-%m-%d").ok()?;
                let close: f64 = cols.get(4)?.trim().parse().ok()?;
                if !close.is_finite() || close <= 0.0 {
                    return None;
                }
                Some(EodClose { date, close })
            })
            .collect();
        series.sort_by_key(|point| point.date);
        series
    }
}

impl Default for StooqEodProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EodSeriesProvider for StooqEodProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<EodClose>, MarketDataError> {
        // This feed never answers cross-origin requests, so go straight
        // through the proxy.
        let url = proxy_url(&Self::series_url(symbol));
        let text = fetch_text_with_fallback(&self.client, &url, PROVIDER_ID).await?;
        Ok(Self::parse_csv(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_keeps_valid_rows_sorted() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2026-02-03,500,505,498,503.25,1000\n\
                   2026-02-02,495,501,494,500.10,900\n\
                   bad-date,1,2,3,4,5\n\
                   2026-02-04,503,504,490,0,800";
        let series = StooqEodProvider::parse_csv(csv);
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].date,
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
        );
        assert_eq!(series[0].close, 500.10);
        assert_eq!(series[1].close, 503.25);
    }

    #[test]
    fn test_series_url_lowercases_symbol() {
        assert_eq!(
            StooqEodProvider::series_url("SPY"),
            "https://stooq.com/q/d/l/?s=spy.us&i=d"
        );
    }
}
