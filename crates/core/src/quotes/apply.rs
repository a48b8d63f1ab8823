use pulse_market_data::BatchQuote;

use crate::constants::CASH_TICKER;
use crate::holdings::Position;

/// Symbols eligible for a quote request: non-empty and not the cash row.
pub fn live_symbols(rows: &[Position]) -> Vec<String> {
    rows.iter()
        .map(|row| row.ticker.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty() && symbol != CASH_TICKER)
        .collect()
}

/// Merges extended-hours quotes into the rows. Returns whether any price
/// was touched.
///
/// Percent fields arrive in whole-percent units and are divided by 100.
/// The extended percent is overwritten on every application, including back
/// to `None` when the provider stopped sending one.
pub fn apply_extended_quotes(rows: &mut [Position], quotes: &[BatchQuote]) -> bool {
    let mut updated = false;
    for quote in quotes {
        let symbol = quote.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        let Some(row) = rows.iter_mut().find(|row| row.ticker == symbol) else {
            continue;
        };
        if let Some(price) = positive(quote.regular_market_price) {
            row.price = price;
            updated = true;
        }
        if let Some(price) = quote.extended_price() {
            row.after_hours_price = Some(price);
            updated = true;
        }
        if let Some(pct) = finite(quote.regular_market_change_percent) {
            row.daily_pct = pct / 100.0;
        }
        row.extended_pct = quote.extended_change_percent().map(|pct| pct / 100.0);
    }
    updated
}

/// Merges plain batch quotes (regular price and change only).
///
/// A quote without a positive price is ignored; a missing change percent
/// zeroes the daily change rather than keeping a stale one.
pub fn apply_basic_quotes(rows: &mut [Position], quotes: &[BatchQuote]) -> bool {
    let mut updated = false;
    for quote in quotes {
        let symbol = quote.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        let Some(price) = positive(quote.regular_market_price) else {
            continue;
        };
        let Some(row) = rows.iter_mut().find(|row| row.ticker == symbol) else {
            continue;
        };
        row.price = price;
        row.daily_pct = finite(quote.regular_market_change_percent)
            .map(|pct| pct / 100.0)
            .unwrap_or(0.0);
        updated = true;
    }
    updated
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::AssetKind;

    fn position(ticker: &str) -> Position {
        Position {
            ticker: ticker.into(),
            shares: 10.0,
            price: 100.0,
            after_hours_price: None,
            daily_pct: 0.01,
            extended_pct: Some(0.02),
            month_pct: None,
            year_pct: None,
            kind: AssetKind::Equity,
            sector: "Technology".into(),
        }
    }

    fn quote(symbol: &str) -> BatchQuote {
        BatchQuote {
            symbol: symbol.into(),
            regular_market_price: None,
            post_market_price: None,
            pre_market_price: None,
            regular_market_change_percent: None,
            post_market_change_percent: None,
            pre_market_change_percent: None,
        }
    }

    #[test]
    fn test_live_symbols_excludes_cash_and_blank() {
        let rows = vec![position("NVDA"), position("CASH"), position("  ")];
        assert_eq!(live_symbols(&rows), vec!["NVDA".to_string()]);
    }

    #[test]
    fn test_extended_apply_scales_percents() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("NVDA");
        q.regular_market_price = Some(110.0);
        q.regular_market_change_percent = Some(1.5);
        q.post_market_price = Some(111.0);
        q.post_market_change_percent = Some(0.9);
        assert!(apply_extended_quotes(&mut rows, &[q]));
        assert_eq!(rows[0].price, 110.0);
        assert_eq!(rows[0].after_hours_price, Some(111.0));
        assert_eq!(rows[0].daily_pct, 0.015);
        assert_eq!(rows[0].extended_pct, Some(0.9 / 100.0));
    }

    #[test]
    fn test_extended_apply_prefers_post_falls_back_to_pre() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("NVDA");
        q.pre_market_price = Some(108.0);
        q.pre_market_change_percent = Some(-0.5);
        assert!(apply_extended_quotes(&mut rows, &[q]));
        assert_eq!(rows[0].after_hours_price, Some(108.0));
        assert_eq!(rows[0].extended_pct, Some(-0.005));
    }

    #[test]
    fn test_extended_apply_clears_stale_extended_pct() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("NVDA");
        q.regular_market_price = Some(110.0);
        apply_extended_quotes(&mut rows, &[q]);
        assert_eq!(rows[0].extended_pct, None);
    }

    #[test]
    fn test_extended_apply_unknown_symbol_is_noop() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("TSLA");
        q.regular_market_price = Some(50.0);
        assert!(!apply_extended_quotes(&mut rows, &[q]));
        assert_eq!(rows[0].price, 100.0);
    }

    #[test]
    fn test_basic_apply_requires_positive_price() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("NVDA");
        q.regular_market_price = Some(0.0);
        assert!(!apply_basic_quotes(&mut rows, &[q.clone()]));

        q.regular_market_price = Some(120.0);
        q.regular_market_change_percent = Some(2.0);
        assert!(apply_basic_quotes(&mut rows, &[q]));
        assert_eq!(rows[0].price, 120.0);
        assert_eq!(rows[0].daily_pct, 0.02);
    }

    #[test]
    fn test_basic_apply_missing_percent_zeroes() {
        let mut rows = vec![position("NVDA")];
        let mut q = quote("NVDA");
        q.regular_market_price = Some(120.0);
        assert!(apply_basic_quotes(&mut rows, &[q]));
        assert_eq!(rows[0].daily_pct, 0.0);
    }
}
