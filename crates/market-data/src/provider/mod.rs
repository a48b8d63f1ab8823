//! Provider trait definitions and implementations.

mod fmp;
mod stooq;
mod yahoo;

pub use fmp::FmpBatchProvider;
pub use stooq::StooqEodProvider;
pub use yahoo::YahooBatchProvider;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{BatchQuote, EodClose};

/// Maximum number of symbols per batch request.
pub const SYMBOL_CHUNK_SIZE: usize = 40;

/// Trait for batch quote providers.
///
/// Implementations fetch the latest quotes for a set of symbols in one or
/// more requests. Symbols the provider does not know are simply absent from
/// the result; an empty result is not an error.
#[async_trait]
pub trait BatchQuoteProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch the latest quotes for the given symbols.
    async fn fetch_batch(&self, symbols: &[String]) -> Result<Vec<BatchQuote>, MarketDataError>;
}

/// Trait for benchmark end-of-day close series providers.
#[async_trait]
pub trait EodSeriesProvider: Send + Sync {
    /// Unique identifier for this provider.
    fn id(&self) -> &'static str;

    /// Fetch the full daily close series for a symbol, ascending by date.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<EodClose>, MarketDataError>;
}

/// Split a symbol list into request-sized chunks.
pub fn chunk_symbols(symbols: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    symbols
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_symbols_splits_evenly() {
        let symbols: Vec<String> = (0..85).map(|i| format!("SYM{i}")).collect();
        let chunks = chunk_symbols(&symbols, SYMBOL_CHUNK_SIZE);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 40);
        assert_eq!(chunks[1].len(), 40);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_chunk_symbols_empty() {
        assert!(chunk_symbols(&[], SYMBOL_CHUNK_SIZE).is_empty());
    }
}
