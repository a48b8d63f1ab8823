use crate::holdings::{DisplayMode, DisplayRow, Position};

/// Sort metric for the holdings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Value,
    DailyPct,
    /// `value × dailyPct`, the dollar move implied by the day.
    DailyValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Signed aggregates over a set of display rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub daily_change_value: f64,
    pub daily_change_pct: f64,
    pub month_change_value: f64,
    pub year_change_value: f64,
}

fn regular_price(row: &Position) -> f64 {
    if row.price.is_finite() && row.price > 0.0 {
        row.price
    } else {
        0.0
    }
}

/// Resolves positions against a display mode.
///
/// In extended mode a row with a positive after-hours price is valued at
/// that price; its daily change uses the provider's extended percent when
/// known, else the implied move against the regular price. Rows without
/// extended data always fall back to regular-session figures.
pub fn display_rows(rows: &[Position], mode: DisplayMode) -> Vec<DisplayRow> {
    rows.iter()
        .map(|row| {
            let regular = regular_price(row);
            let use_extended = mode == DisplayMode::Extended
                && row.after_hours_price.is_some_and(|p| p > 0.0);
            let price = if use_extended {
                row.after_hours_price.unwrap_or(regular)
            } else {
                regular
            };
            let mut daily_pct = if row.daily_pct.is_finite() { row.daily_pct } else { 0.0 };
            if use_extended {
                if let Some(extended) = row.extended_pct.filter(|p| p.is_finite()) {
                    daily_pct = extended;
                } else if regular > 0.0 {
                    daily_pct = price / regular - 1.0;
                }
            }
            DisplayRow {
                ticker: row.ticker.clone(),
                shares: row.shares,
                price,
                regular_price: regular,
                daily_pct,
                value: row.shares * price,
                kind: row.kind,
                sector: row.sector.clone(),
                month_pct: row.month_pct,
                year_pct: row.year_pct,
            }
        })
        .collect()
}

/// Rows valued at regular-session prices regardless of the active mode.
pub fn regular_rows(rows: &[Position]) -> Vec<DisplayRow> {
    display_rows(rows, DisplayMode::Regular)
}

/// Stable-sorted copy of the rows by the chosen metric.
///
/// Ties break by value descending, then daily percent descending, so the
/// table order does not jitter between renders.
pub fn sorted_rows(rows: &[DisplayRow], key: SortKey, direction: SortDirection) -> Vec<DisplayRow> {
    let metric = |row: &DisplayRow| match key {
        SortKey::Value => row.value,
        SortKey::DailyPct => row.daily_pct,
        SortKey::DailyValue => row.daily_value(),
    };
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = metric(a).total_cmp(&metric(b));
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering
            .then_with(|| b.value.total_cmp(&a.value))
            .then_with(|| b.daily_pct.total_cmp(&a.daily_pct))
    });
    sorted
}

/// Canonical string over regular prices, used to detect whether anything
/// about the market picture changed since the last persisted record.
pub fn market_record_signature(rows: &[DisplayRow]) -> String {
    let mut entries: Vec<(String, f64, f64, f64)> = rows
        .iter()
        .map(|row| {
            let daily_pct = if row.daily_pct.is_finite() { row.daily_pct } else { 0.0 };
            (row.ticker.clone(), row.shares, row.regular_price, daily_pct)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
        .iter()
        .map(|(ticker, shares, price, pct)| {
            format!("{ticker}:{shares:.6}:{price:.6}:{pct:.6}")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Sums total value and the signed day/month/year dollar moves.
pub fn portfolio_totals(rows: &[DisplayRow]) -> PortfolioTotals {
    let total_value: f64 = rows.iter().map(|row| row.value).sum();
    let daily_change_value: f64 = rows.iter().map(DisplayRow::daily_value).sum();
    let month_change_value: f64 = rows
        .iter()
        .filter_map(|row| row.month_pct.map(|pct| row.value * pct))
        .sum();
    let year_change_value: f64 = rows
        .iter()
        .filter_map(|row| row.year_pct.map(|pct| row.value * pct))
        .sum();
    PortfolioTotals {
        total_value,
        daily_change_value,
        daily_change_pct: if total_value > 0.0 {
            daily_change_value / total_value
        } else {
            0.0
        },
        month_change_value,
        year_change_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::AssetKind;

    fn position(ticker: &str, shares: f64, price: f64, daily_pct: f64) -> Position {
        Position {
            ticker: ticker.into(),
            shares,
            price,
            after_hours_price: None,
            daily_pct,
            extended_pct: None,
            month_pct: None,
            year_pct: None,
            kind: AssetKind::Equity,
            sector: "Technology".into(),
        }
    }

    #[test]
    fn test_display_rows_regular_mode() {
        let rows = display_rows(&[position("NVDA", 10.0, 181.5, 0.011)], DisplayMode::Regular);
        assert_eq!(rows[0].price, 181.5);
        assert_eq!(rows[0].value, 1815.0);
        assert_eq!(rows[0].daily_pct, 0.011);
    }

    #[test]
    fn test_display_rows_extended_uses_after_hours_price() {
        let mut pos = position("NVDA", 10.0, 100.0, 0.01);
        pos.after_hours_price = Some(102.0);
        let rows = display_rows(&[pos], DisplayMode::Extended);
        assert_eq!(rows[0].price, 102.0);
        assert!((rows[0].daily_pct - 0.02).abs() < 1e-12);
        assert_eq!(rows[0].regular_price, 100.0);
    }

    #[test]
    fn test_display_rows_extended_prefers_provider_percent() {
        let mut pos = position("NVDA", 10.0, 100.0, 0.01);
        pos.after_hours_price = Some(102.0);
        pos.extended_pct = Some(0.015);
        let rows = display_rows(&[pos], DisplayMode::Extended);
        assert_eq!(rows[0].daily_pct, 0.015);
    }

    #[test]
    fn test_display_rows_extended_without_data_falls_back() {
        let rows = display_rows(&[position("AAPL", 5.0, 230.0, -0.004)], DisplayMode::Extended);
        assert_eq!(rows[0].price, 230.0);
        assert_eq!(rows[0].daily_pct, -0.004);
    }

    #[test]
    fn test_sorted_rows_tie_break() {
        let rows = regular_rows(&[
            position("A", 1.0, 100.0, 0.02),
            position("B", 1.0, 100.0, 0.05),
            position("C", 2.0, 100.0, 0.01),
        ]);
        let sorted = sorted_rows(&rows, SortKey::Value, SortDirection::Desc);
        // C has the largest value; A and B tie on value, B wins by dailyPct.
        let tickers: Vec<&str> = sorted.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["C", "B", "A"]);
    }

    #[test]
    fn test_sorted_rows_daily_value_asc() {
        let rows = regular_rows(&[
            position("A", 1.0, 100.0, 0.02),
            position("B", 1.0, 100.0, -0.05),
        ]);
        let sorted = sorted_rows(&rows, SortKey::DailyValue, SortDirection::Asc);
        assert_eq!(sorted[0].ticker, "B");
    }

    #[test]
    fn test_market_record_signature_sorted_and_fixed() {
        let rows = regular_rows(&[
            position("MSFT", 3.0, 415.0, -0.002),
            position("AAPL", 5.0, 230.0, 0.011),
        ]);
        let sig = market_record_signature(&rows);
        assert_eq!(
            sig,
            "AAPL:5.000000:230.000000:0.011000|MSFT:3.000000:415.000000:-0.002000"
        );
    }

    #[test]
    fn test_portfolio_totals() {
        let rows = regular_rows(&[
            position("AAPL", 5.0, 230.0, 0.01),
            position("MSFT", 2.0, 400.0, -0.02),
        ]);
        let totals = portfolio_totals(&rows);
        assert_eq!(totals.total_value, 1950.0);
        assert!((totals.daily_change_value - (11.5 - 16.0)).abs() < 1e-9);
        assert!((totals.daily_change_pct - (-4.5 / 1950.0)).abs() < 1e-12);
    }
}
