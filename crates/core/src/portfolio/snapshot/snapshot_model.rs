use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_SECTOR;
use crate::holdings::DisplayRow;
use crate::utils::parse_iso_date;

/// One holding as frozen inside a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPosition {
    #[serde(default)]
    pub shares: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub is_cash: bool,
    #[serde(default)]
    pub is_crypto: bool,
    #[serde(default)]
    pub sector: String,
}

/// End-of-day portfolio state keyed by local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Local ISO date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub positions: BTreeMap<String, SnapshotPosition>,
}

impl Snapshot {
    /// Builds today's snapshot from the current regular-priced rows.
    pub fn from_rows(rows: &[DisplayRow], total_value: f64, date: NaiveDate) -> Self {
        let mut positions = BTreeMap::new();
        for row in rows {
            let ticker = row.ticker.trim().to_uppercase();
            if ticker.is_empty() {
                continue;
            }
            let sector = {
                let trimmed = row.sector.trim();
                if trimmed.is_empty() {
                    UNKNOWN_SECTOR.to_string()
                } else {
                    trimmed.to_string()
                }
            };
            positions.insert(
                ticker,
                SnapshotPosition {
                    shares: finite_or_zero(row.shares),
                    price: finite_or_zero(row.price),
                    value: finite_or_zero(row.value),
                    is_cash: row.kind.is_cash(),
                    is_crypto: row.kind.is_crypto(),
                    sector,
                },
            );
        }
        Snapshot {
            date: date.to_string(),
            total_value: if total_value.is_finite() && total_value > 0.0 {
                total_value
            } else {
                0.0
            },
            positions,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// A snapshot is persisted only when its date parses and it carries value.
    pub fn is_valid(&self) -> bool {
        self.parsed_date().is_some() && self.total_value.is_finite() && self.total_value > 0.0
    }
}

/// Daily profit/loss record, same latest-wins-per-date rule as snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlEntry {
    pub date: String,
    #[serde(default)]
    pub pl: f64,
    #[serde(default)]
    pub pct: f64,
}

impl DailyPlEntry {
    pub fn is_valid(&self) -> bool {
        parse_iso_date(&self.date).is_some() && self.pl.is_finite()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::AssetKind;

    #[test]
    fn test_from_rows_uppercases_and_defaults_sector() {
        let rows = vec![DisplayRow {
            ticker: "nvda".into(),
            shares: 10.0,
            price: 181.5,
            regular_price: 181.5,
            daily_pct: 0.0,
            value: 1815.0,
            kind: AssetKind::Equity,
            sector: "  ".into(),
            month_pct: None,
            year_pct: None,
        }];
        let snap = Snapshot::from_rows(&rows, 1815.0, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let pos = &snap.positions["NVDA"];
        assert_eq!(pos.sector, "Unknown");
        assert_eq!(snap.date, "2026-03-01");
        assert!(snap.is_valid());
    }

    #[test]
    fn test_snapshot_validity() {
        let snap = Snapshot {
            date: "not-a-date".into(),
            total_value: 10.0,
            positions: BTreeMap::new(),
        };
        assert!(!snap.is_valid());
        let snap = Snapshot {
            date: "2026-03-01".into(),
            total_value: 0.0,
            positions: BTreeMap::new(),
        };
        assert!(!snap.is_valid());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snap = Snapshot::from_rows(&[], 1.0, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"totalValue\":1.0"));
        assert!(json.contains("\"positions\":{}"));
    }
}
