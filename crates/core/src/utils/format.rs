//! Display formatting helpers.
//!
//! These mirror the en-US number formats the dashboard renders: USD with
//! grouping and two decimals, percents trimmed to at most two decimals.

use chrono::{DateTime, Utc};

/// Format a fraction as a signed percent, e.g. `0.011` -> `"+1.1%"`.
/// At most two decimal places, trailing zeros trimmed, `+` only for
/// positive values. Non-finite input renders as `0%`.
pub fn format_signed_percent(value: f64) -> String {
    let safe = if value.is_finite() { value } else { 0.0 };
    let body = trim_decimal(safe.abs() * 100.0);
    if safe > 0.0 {
        format!("+{body}%")
    } else if safe < 0.0 {
        format!("-{body}%")
    } else {
        "0%".to_string()
    }
}

/// Format a fraction as an unsigned percent, e.g. `0.365` -> `"36.5%"`.
pub fn format_percent(value: f64) -> String {
    let safe = if value.is_finite() { value } else { 0.0 };
    let body = if safe < 0.0 {
        format!("-{}", trim_decimal(safe.abs() * 100.0))
    } else {
        trim_decimal(safe * 100.0)
    };
    format!("{body}%")
}

/// Format a value as USD, e.g. `85705.5` -> `"$85,705.50"`.
pub fn format_currency(value: f64) -> String {
    let safe = if value.is_finite() { value } else { 0.0 };
    let body = group_thousands(format!("{:.2}", safe.abs()));
    if safe < 0.0 {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Format a value as USD with an explicit `+` for gains.
pub fn format_signed_currency(value: f64) -> String {
    let safe = if value.is_finite() { value } else { 0.0 };
    if safe > 0.0 {
        format!("+{}", format_currency(safe))
    } else {
        format_currency(safe)
    }
}

/// Compact signed amount for calendar cells, e.g. `+$1.2K`, `-$85`.
/// Scales to `K`/`M`, keeps fewer decimals as the number grows and trims
/// trailing zeros. Zero renders as a gain (`+$0`).
pub fn format_compact_amount(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (abs / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (abs / 1_000.0, "K")
    } else {
        (abs, "")
    };
    let decimals = if scaled >= 100.0 {
        0
    } else if scaled >= 10.0 {
        1
    } else {
        2
    };
    let compact = trim_trailing_zeros(format!("{scaled:.decimals$}"));
    let sign = if value >= 0.0 { "+" } else { "-" };
    format!("{sign}${compact}{suffix}")
}

/// Human age of a timestamp: `never`, `just now`, `12m ago`, `3h ago`,
/// `2d ago`.
pub fn format_relative_age(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(updated_at) = updated_at else {
        return "never".to_string();
    };
    let minutes = (now - updated_at).num_seconds().max(0) as f64 / 60.0;
    let minutes = minutes.round() as i64;
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Round to two decimals and strip trailing zeros / the trailing dot.
fn trim_decimal(value: f64) -> String {
    trim_trailing_zeros(format!("{value:.2}"))
}

fn trim_trailing_zeros(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

fn group_thousands(formatted: String) -> String {
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
