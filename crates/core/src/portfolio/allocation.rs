use std::collections::HashMap;

use crate::constants::{DIGITAL_ASSETS_SECTOR, UNKNOWN_SECTOR};
use crate::holdings::DisplayRow;

const SECTOR_BREAKDOWN_LIMIT: usize = 8;

/// One sector bucket of the exposure breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSlice {
    pub name: String,
    pub value: f64,
    pub pct: f64,
}

/// Asset-class and sector exposure over the currently valued rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioExposure {
    pub total_value: f64,
    pub equity_value: f64,
    pub crypto_value: f64,
    pub cash_value: f64,
    pub equity_pct: f64,
    pub crypto_pct: f64,
    pub cash_pct: f64,
    pub sector_breakdown: Vec<SectorSlice>,
}

/// Buckets rows into equity/crypto/cash totals and a top-8 sector breakdown.
///
/// Only rows with a positive value participate. Crypto rows collapse into the
/// synthetic "Digital Assets" sector; cash is excluded from the breakdown.
/// All percentages use total value as the denominator and are 0 when the
/// total is 0.
pub fn portfolio_exposure(rows: &[DisplayRow]) -> PortfolioExposure {
    let valued: Vec<&DisplayRow> = rows
        .iter()
        .filter(|row| row.value.is_finite() && row.value > 0.0)
        .collect();
    let total_value: f64 = valued.iter().map(|row| row.value).sum();
    let crypto_value: f64 = valued
        .iter()
        .filter(|row| row.kind.is_crypto())
        .map(|row| row.value)
        .sum();
    let cash_value: f64 = valued
        .iter()
        .filter(|row| row.kind.is_cash())
        .map(|row| row.value)
        .sum();
    let equity_value = (total_value - crypto_value - cash_value).max(0.0);

    let mut sectors: HashMap<String, f64> = HashMap::new();
    for row in valued.iter().filter(|row| !row.kind.is_cash()) {
        let name = if row.kind.is_crypto() {
            DIGITAL_ASSETS_SECTOR.to_string()
        } else {
            let trimmed = row.sector.trim();
            if trimmed.is_empty() {
                UNKNOWN_SECTOR.to_string()
            } else {
                trimmed.to_string()
            }
        };
        *sectors.entry(name).or_insert(0.0) += row.value;
    }
    let pct_of_total = |value: f64| if total_value > 0.0 { value / total_value } else { 0.0 };
    let mut sector_breakdown: Vec<SectorSlice> = sectors
        .into_iter()
        .map(|(name, value)| SectorSlice {
            name,
            value,
            pct: pct_of_total(value),
        })
        .collect();
    sector_breakdown.sort_by(|a, b| b.value.total_cmp(&a.value));
    sector_breakdown.truncate(SECTOR_BREAKDOWN_LIMIT);

    PortfolioExposure {
        total_value,
        equity_value,
        crypto_value,
        cash_value,
        equity_pct: pct_of_total(equity_value),
        crypto_pct: pct_of_total(crypto_value),
        cash_pct: pct_of_total(cash_value),
        sector_breakdown,
    }
}
