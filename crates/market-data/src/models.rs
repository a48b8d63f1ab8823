//! Wire-level models shared by the quote and benchmark providers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single symbol's batch quote as reported by a provider.
///
/// Percent fields are in whole-percent units exactly as the providers send
/// them (`1.1` means +1.1%); the dashboard core divides by 100 when applying
/// a quote to a holding. Providers that know nothing about extended hours
/// leave the post/pre fields `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchQuote {
    /// Upper-cased ticker symbol.
    pub symbol: String,
    /// Last regular-session price.
    pub regular_market_price: Option<f64>,
    /// Post-market price, when the session has one.
    pub post_market_price: Option<f64>,
    /// Pre-market price, when the session has one.
    pub pre_market_price: Option<f64>,
    /// Regular-session change, whole percent.
    pub regular_market_change_percent: Option<f64>,
    /// Post-market change, whole percent.
    pub post_market_change_percent: Option<f64>,
    /// Pre-market change, whole percent.
    pub pre_market_change_percent: Option<f64>,
}

impl BatchQuote {
    /// The extended-session price: post-market preferred, pre-market as a
    /// fallback when only the pre-session traded.
    pub fn extended_price(&self) -> Option<f64> {
        match self.post_market_price {
            Some(p) if p > 0.0 => Some(p),
            _ => self.pre_market_price.filter(|p| *p > 0.0),
        }
    }

    /// The extended-session change percent, same preference order as
    /// [`extended_price`](Self::extended_price).
    pub fn extended_change_percent(&self) -> Option<f64> {
        self.post_market_change_percent
            .or(self.pre_market_change_percent)
    }
}

/// One end-of-day close of a benchmark symbol.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EodClose {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price, always positive.
    pub close: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_price_prefers_post_market() {
        let quote = BatchQuote {
            symbol: "NVDA".to_string(),
            post_market_price: Some(770.0),
            pre_market_price: Some(760.0),
            ..Default::default()
        };
        assert_eq!(quote.extended_price(), Some(770.0));
    }

    #[test]
    fn test_extended_price_falls_back_to_pre_market() {
        let quote = BatchQuote {
            symbol: "NVDA".to_string(),
            post_market_price: None,
            pre_market_price: Some(760.0),
            ..Default::default()
        };
        assert_eq!(quote.extended_price(), Some(760.0));
    }

    #[test]
    fn test_extended_price_ignores_non_positive() {
        let quote = BatchQuote {
            symbol: "NVDA".to_string(),
            post_market_price: Some(0.0),
            pre_market_price: None,
            ..Default::default()
        };
        assert_eq!(quote.extended_price(), None);
    }
}
