//! Holdings ingestion: CSV decoding and row normalization.

mod holdings_csv;
mod holdings_model;
mod holdings_normalizer;

pub use holdings_csv::{parse_delimited, parse_history_csv, RawRecord};
pub use holdings_model::{AssetKind, DisplayMode, DisplayRow, HistoryPoint, Position};
pub use holdings_normalizer::{normalize_row, normalize_rows, parse_bool_flag, parse_percent};
