//! Local-date helpers.
//!
//! Snapshots and daily P/L entries are keyed by the viewer's local calendar
//! day, not UTC; every date that reaches the persistent store goes through
//! these helpers.

use chrono::{Local, NaiveDate};

/// Format a date as local ISO `YYYY-MM-DD`.
pub fn to_iso_local(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` string. Anything else (shorter fields,
/// trailing garbage, impossible dates) yields `None`.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date_strict() {
        assert_eq!(
            parse_iso_date("2026-02-01"),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(parse_iso_date("2026-2-1"), None);
        assert_eq!(parse_iso_date("2026-02-01T00:00"), None);
        assert_eq!(parse_iso_date("2026-02-30"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_to_iso_local_round_trip() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(parse_iso_date(&to_iso_local(date)), Some(date));
    }
}
