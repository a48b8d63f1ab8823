//! Date and formatting helpers shared across the dashboard.

mod format;
mod time;

pub use format::{
    format_compact_amount, format_currency, format_percent, format_relative_age,
    format_signed_currency, format_signed_percent,
};
pub use time::{local_today, parse_iso_date, to_iso_local};
