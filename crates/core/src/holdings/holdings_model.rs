use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::CASH_TICKER;

/// Broad asset classification for a portfolio row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Equity,
    Crypto,
    Cash,
}

impl AssetKind {
    pub fn is_cash(&self) -> bool {
        matches!(self, AssetKind::Cash)
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, AssetKind::Crypto)
    }
}

/// One normalized holding as loaded from the holdings CSV.
///
/// All percent fields are stored as fractions (0.011 means +1.1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub shares: f64,
    /// Regular-session price per share.
    pub price: f64,
    /// After-hours price; `None` when the feed supplied no positive value.
    pub after_hours_price: Option<f64>,
    /// Regular-session daily change fraction.
    pub daily_pct: f64,
    /// Extended-session change fraction when the feed supplied one.
    pub extended_pct: Option<f64>,
    pub month_pct: Option<f64>,
    pub year_pct: Option<f64>,
    pub kind: AssetKind,
    pub sector: String,
}

impl Position {
    pub fn is_cash(&self) -> bool {
        self.kind.is_cash() || self.ticker == CASH_TICKER
    }

    /// Market value at the regular-session price.
    pub fn regular_value(&self) -> f64 {
        self.shares * self.price
    }
}

/// Which session prices the dashboard values positions at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Regular,
    Extended,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Regular => "regular",
            DisplayMode::Extended => "extended",
        }
    }

    /// Anything other than the literal `extended` falls back to regular.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("extended") {
            DisplayMode::Extended
        } else {
            DisplayMode::Regular
        }
    }
}

/// A position resolved against the active [`DisplayMode`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub ticker: String,
    pub shares: f64,
    /// Price used for valuation in the active mode.
    pub price: f64,
    /// Regular-session price, kept for persistence signatures.
    pub regular_price: f64,
    /// Daily change fraction in the active mode.
    pub daily_pct: f64,
    pub value: f64,
    pub kind: AssetKind,
    pub sector: String,
    pub month_pct: Option<f64>,
    pub year_pct: Option<f64>,
}

impl DisplayRow {
    /// Dollar P/L implied by the daily change fraction.
    pub fn daily_value(&self) -> f64 {
        self.value * self.daily_pct
    }
}

/// One point of an externally supplied portfolio-value history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mode_parse_defaults_to_regular() {
        assert_eq!(DisplayMode::parse("extended"), DisplayMode::Extended);
        assert_eq!(DisplayMode::parse("EXTENDED "), DisplayMode::Extended);
        assert_eq!(DisplayMode::parse("regular"), DisplayMode::Regular);
        assert_eq!(DisplayMode::parse("weird"), DisplayMode::Regular);
        assert_eq!(DisplayMode::parse(""), DisplayMode::Regular);
    }

    #[test]
    fn test_cash_ticker_counts_as_cash() {
        let row = Position {
            ticker: "CASH".into(),
            shares: 100.0,
            price: 1.0,
            after_hours_price: None,
            daily_pct: 0.0,
            extended_pct: None,
            month_pct: None,
            year_pct: None,
            kind: AssetKind::Equity,
            sector: "Unknown".into(),
        };
        assert!(row.is_cash());
    }
}
