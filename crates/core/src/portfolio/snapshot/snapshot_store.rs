use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{
    DAILY_PL_HISTORY_LIMIT, DAILY_PL_STORAGE_KEY, PORTFOLIO_HISTORY_LIMIT,
    PORTFOLIO_HISTORY_STORAGE_KEY,
};
use crate::holdings::DisplayRow;
use crate::portfolio::snapshot::{DailyPlEntry, Snapshot};
use crate::storage::KvStore;

/// Persistence facade for snapshot and daily P/L history.
///
/// The store is deliberately forgiving: unreadable or corrupt values load as
/// an empty history, and failed writes are logged and ignored so a broken
/// backing store never takes the dashboard down.
pub struct SnapshotStore {
    store: Arc<dyn KvStore>,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        SnapshotStore { store }
    }

    /// Valid snapshots sorted ascending by date, newest 520 kept.
    pub fn load_snapshots(&self) -> Vec<Snapshot> {
        let mut history: Vec<Snapshot> = self.load_list(PORTFOLIO_HISTORY_STORAGE_KEY);
        history.retain(Snapshot::is_valid);
        normalize_tickers(&mut history);
        history.sort_by(|a, b| a.date.cmp(&b.date));
        keep_newest(&mut history, PORTFOLIO_HISTORY_LIMIT);
        history
    }

    /// Replaces or appends today's snapshot and persists the capped history.
    pub fn upsert_today_snapshot(
        &self,
        rows: &[DisplayRow],
        total_value: f64,
        today: NaiveDate,
    ) -> Vec<Snapshot> {
        let entry = Snapshot::from_rows(rows, total_value, today);
        let mut history = self.load_snapshots();
        upsert_by_date(&mut history, entry, |snap| &snap.date);
        keep_newest(&mut history, PORTFOLIO_HISTORY_LIMIT);
        self.save_list(PORTFOLIO_HISTORY_STORAGE_KEY, &history);
        history
    }

    /// Valid daily P/L entries sorted ascending, newest 400 kept.
    pub fn load_daily_pl(&self) -> Vec<DailyPlEntry> {
        let mut history: Vec<DailyPlEntry> = self.load_list(DAILY_PL_STORAGE_KEY);
        history.retain(DailyPlEntry::is_valid);
        history.sort_by(|a, b| a.date.cmp(&b.date));
        keep_newest(&mut history, DAILY_PL_HISTORY_LIMIT);
        history
    }

    pub fn upsert_today_daily_pl(&self, pl: f64, pct: f64, today: NaiveDate) -> Vec<DailyPlEntry> {
        let entry = DailyPlEntry {
            date: today.to_string(),
            pl: if pl.is_finite() { pl } else { 0.0 },
            pct: if pct.is_finite() { pct } else { 0.0 },
        };
        let mut history = self.load_daily_pl();
        upsert_by_date(&mut history, entry, |item| &item.date);
        keep_newest(&mut history, DAILY_PL_HISTORY_LIMIT);
        self.save_list(DAILY_PL_STORAGE_KEY, &history);
        history
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                debug!("Failed to read {key}: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!("Failed to parse {key}: {err}");
                Vec::new()
            }
        }
    }

    fn save_list<T: Serialize>(&self, key: &str, list: &[T]) {
        let payload = match serde_json::to_string(list) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to serialize {key}: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(key, &payload) {
            warn!("Failed to persist {key}: {err}");
        }
    }
}

fn normalize_tickers(history: &mut [Snapshot]) {
    for snap in history {
        let normalized: std::collections::BTreeMap<_, _> = std::mem::take(&mut snap.positions)
            .into_iter()
            .filter_map(|(ticker, pos)| {
                let symbol = ticker.trim().to_uppercase();
                (!symbol.is_empty()).then_some((symbol, pos))
            })
            .collect();
        snap.positions = normalized;
    }
}

fn upsert_by_date<T>(history: &mut Vec<T>, entry: T, date_of: impl Fn(&T) -> &str) {
    let date = date_of(&entry).to_string();
    if let Some(existing) = history.iter_mut().find(|item| date_of(item) == date) {
        *existing = entry;
    } else {
        history.push(entry);
        history.sort_by(|a, b| date_of(a).cmp(date_of(b)));
    }
}

fn keep_newest<T>(history: &mut Vec<T>, limit: usize) {
    if history.len() > limit {
        history.drain(0..history.len() - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::AssetKind;
    use crate::storage::MemoryKvStore;

    fn store() -> SnapshotStore {
        SnapshotStore::new(Arc::new(MemoryKvStore::new()))
    }

    fn day(iso: &str) -> NaiveDate {
        iso.parse().unwrap()
    }

    fn row(ticker: &str, shares: f64, price: f64) -> DisplayRow {
        DisplayRow {
            ticker: ticker.into(),
            shares,
            price,
            regular_price: price,
            daily_pct: 0.0,
            value: shares * price,
            kind: AssetKind::Equity,
            sector: "Technology".into(),
            month_pct: None,
            year_pct: None,
        }
    }

    #[test]
    fn test_load_empty_store() {
        assert!(store().load_snapshots().is_empty());
        assert!(store().load_daily_pl().is_empty());
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(PORTFOLIO_HISTORY_STORAGE_KEY, "not json").unwrap();
        let snapshots = SnapshotStore::new(kv).load_snapshots();
        assert!(snapshots.is_empty());
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let store = store();
        let rows = vec![row("AAPL", 5.0, 230.0)];
        store.upsert_today_snapshot(&rows, 1150.0, day("2026-03-02"));
        let rows = vec![row("AAPL", 5.0, 231.0)];
        let history = store.upsert_today_snapshot(&rows, 1155.0, day("2026-03-02"));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_value, 1155.0);
    }

    #[test]
    fn test_upsert_sorts_new_dates() {
        let store = store();
        store.upsert_today_snapshot(&[row("A", 1.0, 10.0)], 10.0, day("2026-03-03"));
        store.upsert_today_snapshot(&[row("A", 1.0, 9.0)], 9.0, day("2026-03-01"));
        let history = store.load_snapshots();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, "2026-03-01");
        assert_eq!(history[1].date, "2026-03-03");
    }

    #[test]
    fn test_invalid_snapshots_filtered_on_load() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(
            PORTFOLIO_HISTORY_STORAGE_KEY,
            r#"[{"date":"2026-03-01","totalValue":100,"positions":{}},
                {"date":"bad","totalValue":100,"positions":{}},
                {"date":"2026-03-02","totalValue":0,"positions":{}}]"#,
        )
        .unwrap();
        let history = SnapshotStore::new(kv).load_snapshots();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, "2026-03-01");
    }

    #[test]
    fn test_daily_pl_cap() {
        let store = store();
        for offset in 0..(DAILY_PL_HISTORY_LIMIT as i64 + 5) {
            let date = day("2024-01-01") + chrono::Duration::days(offset);
            store.upsert_today_daily_pl(offset as f64, 0.0, date);
        }
        let history = store.load_daily_pl();
        assert_eq!(history.len(), DAILY_PL_HISTORY_LIMIT);
        // Oldest entries were truncated.
        assert_eq!(history[0].pl, 5.0);
    }
}
