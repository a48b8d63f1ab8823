//! Per-day portfolio snapshots and daily P/L history, persisted in the
//! key-value store as JSON arrays.

mod snapshot_model;
mod snapshot_store;

pub use snapshot_model::{DailyPlEntry, Snapshot, SnapshotPosition};
pub use snapshot_store::SnapshotStore;
