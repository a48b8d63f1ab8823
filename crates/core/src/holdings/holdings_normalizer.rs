use crate::constants::UNKNOWN_SECTOR;
use crate::holdings::{AssetKind, Position, RawRecord};

const AFTER_HOURS_ALIASES: &[&str] = &[
    "after hours price",
    "after-hour price",
    "afterhours price",
    "extended hours price",
    "post market price",
    "after market price",
];

const SECTOR_ALIASES: &[&str] = &["sector", "gics sector", "industry", "category"];

/// Normalizes decoded CSV records into positions, dropping empty tickers.
pub fn normalize_rows(records: &[RawRecord]) -> Vec<Position> {
    records.iter().filter_map(normalize_row).collect()
}

/// Resolves a raw header-keyed record into a canonical [`Position`].
///
/// Record keys are matched case-insensitively with whitespace runs collapsed,
/// so `Daily Change %` and `daily  change %` both resolve. Returns `None`
/// when the ticker cell is empty.
pub fn normalize_row(record: &RawRecord) -> Option<Position> {
    let normalized: RawRecord = record
        .iter()
        .map(|(key, value)| (clean_key(key), value.clone()))
        .collect();

    let ticker = field(&normalized, &["ticker", "ticket"]).trim().to_uppercase();
    if ticker.is_empty() {
        return None;
    }

    let shares = parse_number(field(&normalized, &["shares"]));
    let price = parse_number(field(&normalized, &["price (current)", "price"]));

    let after_hours = parse_number(field(&normalized, AFTER_HOURS_ALIASES));
    let after_hours_price = (after_hours > 0.0).then_some(after_hours);

    let daily_pct = parse_percent(field(&normalized, &["daily change %", "daily %"]));
    let month_pct = parse_whole_percent(field(&normalized, &["monthly change %", "month change %"]));
    let year_pct = parse_whole_percent(field(&normalized, &["yearly change %", "year change %"]));

    let is_cash = parse_bool_flag(field(&normalized, &["is cash"])) || ticker == "CASH";
    let is_crypto = !is_cash && parse_bool_flag(field(&normalized, &["is crypto"]));
    let kind = if is_cash {
        AssetKind::Cash
    } else if is_crypto {
        AssetKind::Crypto
    } else {
        AssetKind::Equity
    };

    let sector_raw = field(&normalized, SECTOR_ALIASES).trim();
    let sector = if sector_raw.is_empty() {
        UNKNOWN_SECTOR.to_string()
    } else {
        sector_raw.to_string()
    };

    Some(Position {
        ticker,
        shares,
        price,
        after_hours_price,
        daily_pct,
        extended_pct: None,
        month_pct,
        year_pct,
        kind,
        sector,
    })
}

fn clean_key(key: &str) -> String {
    key.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field<'a>(record: &'a RawRecord, aliases: &[&str]) -> &'a str {
    aliases
        .iter()
        .find_map(|alias| record.get(*alias).map(String::as_str))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("")
}

fn parse_number(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Coerces a percent cell into a signed fraction.
///
/// Values carrying an explicit `%`, or whose magnitude is at least 1, are
/// treated as percent-scaled and divided by 100. Smaller bare values are
/// taken as already fractional. Empty or unparseable cells become 0.
pub fn parse_percent(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let has_percent = trimmed.contains('%');
    let value = parse_number(&trimmed.replace('%', ""));
    if value == 0.0 {
        return 0.0;
    }
    if has_percent || value.abs() >= 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// Month/year columns always arrive percent-scaled; absent cells stay `None`.
fn parse_whole_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(parse_number(&trimmed.replace('%', "")) / 100.0)
}

/// Truthy spellings accepted for CSV boolean columns.
pub fn parse_bool_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "t"
    )
}
