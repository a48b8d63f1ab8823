//! FMP-style keyed batch quote provider.
//!
//! Fallback quote source, used when the extended-hours provider returned no
//! usable data. Requires an API key; HTTP 429 is surfaced as
//! [`MarketDataError::RateLimited`] so the ingestion loop can back off.
//! Only regular-session data is available from this endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::BatchQuote;

use super::BatchQuoteProvider;

const BASE_URL: &str = "https://financialmodelingprep.com/stable/batch-quote";
const PROVIDER_ID: &str = "FMP";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct FmpQuote {
    symbol: Option<String>,
    price: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
}

/// Keyed batch quote provider.
pub struct FmpBatchProvider {
    client: Client,
    api_key: String,
}

impl FmpBatchProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }

    fn batch_url(&self, symbols: &[String]) -> String {
        format!(
            "{}?symbols={}&apikey={}",
            BASE_URL,
            urlencoding::encode(&symbols.join(",")),
            urlencoding::encode(&self.api_key)
        )
    }

    fn parse_items(items: Vec<FmpQuote>) -> Vec<BatchQuote> {
        items
            .into_iter()
            .filter_map(|item| {
                let symbol = item.symbol?.trim().to_uppercase();
                let price = item.price.filter(|p| *p > 0.0)?;
                Some(BatchQuote {
                    symbol,
                    regular_market_price: Some(price),
                    regular_market_change_percent: item.changes_percentage,
                    ..Default::default()
                })
            })
            .collect()
    }
}

#[async_trait]
impl BatchQuoteProvider for FmpBatchProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_batch(&self, symbols: &[String]) -> Result<Vec<BatchQuote>, MarketDataError> {
        if self.api_key.is_empty() {
            return Err(MarketDataError::MissingCredentials {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.client.get(self.batch_url(symbols)).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", response.status()),
            });
        }

        let items: Vec<FmpQuote> =
            response
                .json()
                .await
                .map_err(|err| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("invalid JSON payload: {err}"),
                })?;
        Ok(Self::parse_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_maps_regular_fields() {
        let items = vec![FmpQuote {
            symbol: Some("aapl".to_string()),
            price: Some(183.27),
            changes_percentage: Some(-0.4),
        }];
        let quotes = FmpBatchProvider::parse_items(items);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "AAPL");
        assert_eq!(quotes[0].regular_market_price, Some(183.27));
        assert_eq!(quotes[0].regular_market_change_percent, Some(-0.4));
        assert_eq!(quotes[0].post_market_price, None);
    }

    #[test]
    fn test_parse_items_drops_unpriced_rows() {
        let items = vec![
            FmpQuote {
                symbol: Some("AAPL".to_string()),
                price: Some(0.0),
                changes_percentage: None,
            },
            FmpQuote {
                symbol: None,
                price: Some(10.0),
                changes_percentage: None,
            },
        ];
        assert!(FmpBatchProvider::parse_items(items).is_empty());
    }

    #[test]
    fn test_batch_url_includes_key_and_symbols() {
        let provider = FmpBatchProvider::new("secret".to_string());
        let url = provider.batch_url(&["NVDA".to_string(), "AAPL".to_string()]);
        assert!(url.contains("symbols=NVDA%2CAAPL"));
        assert!(url.contains("apikey=secret"));
    }
}
