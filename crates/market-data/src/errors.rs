//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching market data.
///
/// The quote ingestion loop in `pulse-core` collapses these into per-tick
/// outcomes: `RateLimited` drives exponential backoff, everything else is
/// treated as a transient miss and retried at the base interval.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429).
    /// The caller should back off before retrying.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A provider-specific error occurred (non-OK status, unexpected payload).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider requires credentials that were not configured.
    #[error("Missing credentials for provider: {provider}")]
    MissingCredentials {
        /// The provider lacking credentials
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// True when the error should trigger exponential backoff rather than
    /// a plain retry at the base interval.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MarketDataError::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_classification() {
        let err = MarketDataError::RateLimited {
            provider: "FMP".to_string(),
        };
        assert!(err.is_rate_limited());

        let err = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "HTTP error: 500".to_string(),
        };
        assert!(!err.is_rate_limited());
    }
}
