//! Yahoo-style extended-hours batch quote provider.
//!
//! Primary quote source. Fetches up to [`SYMBOL_CHUNK_SIZE`] symbols per
//! request from the v7 batch quote endpoint and reports regular, post- and
//! pre-market prices plus their change percents. Requests fall back to the
//! CORS proxy when the direct fetch fails.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::BatchQuote;
use crate::proxy::fetch_json_with_fallback;

use super::{chunk_symbols, BatchQuoteProvider, SYMBOL_CHUNK_SIZE};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const PROVIDER_ID: &str = "YAHOO";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: Option<QuoteResponse>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: Option<Vec<QuoteResult>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    symbol: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "postMarketPrice")]
    post_market_price: Option<f64>,
    #[serde(rename = "preMarketPrice")]
    pre_market_price: Option<f64>,
    #[serde(rename = "regularMarketChangePercent")]
    regular_market_change_percent: Option<f64>,
    #[serde(rename = "postMarketChangePercent")]
    post_market_change_percent: Option<f64>,
    #[serde(rename = "preMarketChangePercent")]
    pre_market_change_percent: Option<f64>,
}

/// Extended-hours batch quote provider.
pub struct YahooBatchProvider {
    client: Client,
}

impl YahooBatchProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    fn batch_url(chunk: &[String]) -> String {
        format!(
            "{}?symbols={}",
            BASE_URL,
            urlencoding::encode(&chunk.join(","))
        )
    }

    fn parse_payload(payload: &serde_json::Value) -> Vec<BatchQuote> {
        let envelope: QuoteEnvelope = match serde_json::from_value(payload.clone()) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!("{}: unexpected payload shape: {}", PROVIDER_ID, err);
                return Vec::new();
            }
        };
        let results = envelope
            .quote_response
            .and_then(|r| r.result)
            .unwrap_or_default();

        results
            .into_iter()
            .filter_map(|item| {
                let symbol = item.symbol?.trim().to_uppercase();
                if symbol.is_empty() {
                    return None;
                }
                Some(BatchQuote {
                    symbol,
                    regular_market_price: item.regular_market_price,
                    post_market_price: item.post_market_price,
                    pre_market_price: item.pre_market_price,
                    regular_market_change_percent: item.regular_market_change_percent,
                    post_market_change_percent: item.post_market_change_percent,
                    pre_market_change_percent: item.pre_market_change_percent,
                })
            })
            .collect()
    }
}

impl Default for YahooBatchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BatchQuoteProvider for YahooBatchProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_batch(&self, symbols: &[String]) -> Result<Vec<BatchQuote>, MarketDataError> {
        let mut quotes = Vec::with_capacity(symbols.len());
        for chunk in chunk_symbols(symbols, SYMBOL_CHUNK_SIZE) {
            let url = Self::batch_url(&chunk);
            let payload = match fetch_json_with_fallback(&self.client, &url, PROVIDER_ID).await {
                Ok(payload) => payload,
                Err(err) => {
                    // One failing chunk does not poison the others.
                    debug!("{}: chunk fetch failed: {}", PROVIDER_ID, err);
                    continue;
                }
            };
            quotes.extend(Self::parse_payload(&payload));
        }
        Ok(quotes)
    }
}
