//! Portfolio-level views derived from canonical holdings: display rows,
//! exposure buckets, persisted snapshots, and the performance series.

pub mod allocation;
pub mod holdings_view;
pub mod performance;
pub mod snapshot;

pub use allocation::{portfolio_exposure, PortfolioExposure, SectorSlice};
pub use holdings_view::{
    display_rows, market_record_signature, portfolio_totals, regular_rows, sorted_rows,
    PortfolioTotals, SortDirection, SortKey,
};
pub use performance::{
    build_performance_series, external_flow_between, return_from_base, returns_from_series,
    PeriodReturns, SeriesPoint,
};
pub use snapshot::{DailyPlEntry, Snapshot, SnapshotPosition, SnapshotStore};
