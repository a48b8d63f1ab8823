use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::portfolio::performance::{PeriodReturns, SeriesPoint};
use crate::portfolio::snapshot::Snapshot;

/// Net external cash flow between two adjacent snapshots.
///
/// Every ticker present in either snapshot contributes its share delta
/// valued at a mark price: the current price when positive, else the
/// previous one. Deltas below 1e-9 shares are noise and skipped.
pub fn external_flow_between(previous: &Snapshot, current: &Snapshot) -> f64 {
    let symbols: BTreeSet<&String> = previous
        .positions
        .keys()
        .chain(current.positions.keys())
        .collect();
    let mut flow = 0.0;
    for symbol in symbols {
        let prev = previous.positions.get(symbol);
        let curr = current.positions.get(symbol);
        let prev_shares = prev.map_or(0.0, |p| finite_or_zero(p.shares));
        let curr_shares = curr.map_or(0.0, |p| finite_or_zero(p.shares));
        let delta = curr_shares - prev_shares;
        if delta.abs() < 1e-9 {
            continue;
        }
        let curr_price = curr.map_or(0.0, |p| finite_or_zero(p.price));
        let prev_price = prev.map_or(0.0, |p| finite_or_zero(p.price));
        let mark_price = if curr_price > 0.0 {
            curr_price
        } else if prev_price > 0.0 {
            prev_price
        } else {
            0.0
        };
        if mark_price > 0.0 {
            flow += delta * mark_price;
        }
    }
    flow
}

/// Reconstructs the daily return series from an ascending snapshot list.
pub fn build_performance_series(history: &[Snapshot]) -> Vec<SeriesPoint> {
    let Some(first) = history.first() else {
        return Vec::new();
    };
    let Some(first_date) = first.parsed_date() else {
        return Vec::new();
    };

    let mut series = Vec::with_capacity(history.len());
    let mut index = 100.0;
    series.push(SeriesPoint {
        date: first_date,
        total_value: first.total_value,
        daily_return: None,
        external_flow: 0.0,
        index,
    });

    let mut previous = first;
    for current in &history[1..] {
        let Some(date) = current.parsed_date() else {
            continue;
        };
        let external_flow = external_flow_between(previous, current);
        let prev_value = previous.total_value;
        let mut daily_return = None;
        if prev_value.is_finite() && prev_value > 0.0 && current.total_value.is_finite() {
            let candidate = (current.total_value - prev_value - external_flow) / prev_value;
            if candidate.is_finite() && candidate > -1.0 {
                daily_return = Some(candidate);
            }
        }
        if let Some(r) = daily_return {
            index *= 1.0 + r;
        }
        series.push(SeriesPoint {
            date,
            total_value: current.total_value,
            daily_return,
            external_flow,
            index,
        });
        previous = current;
    }
    series
}

/// `a / b − 1`, or `None` when the base is unusable.
pub fn return_from_base(value: f64, base: f64) -> Option<f64> {
    if !base.is_finite() || base <= 0.0 || !value.is_finite() {
        return None;
    }
    let ratio = value / base - 1.0;
    ratio.is_finite().then_some(ratio)
}

fn entry_on_or_before(series: &[SeriesPoint], target: NaiveDate) -> Option<&SeriesPoint> {
    series.iter().rev().find(|point| point.date <= target)
}

/// Derives the `{d1, w1, m1, ytd}` quadruple from the series index.
///
/// `d1` prefers the latest daily return and falls back to the live daily
/// change percent when the series carries none. Week and month bases are
/// the latest entries at or before today minus 7 and 30 days; the YTD base
/// is the earliest entry of the current year.
pub fn returns_from_series(
    series: &[SeriesPoint],
    fallback_daily_pct: Option<f64>,
    today: NaiveDate,
) -> PeriodReturns {
    let fallback = fallback_daily_pct.filter(|p| p.is_finite());
    let Some(latest) = series.last() else {
        return PeriodReturns {
            d1: fallback,
            ..PeriodReturns::default()
        };
    };

    let week_base = entry_on_or_before(series, today - Duration::days(7));
    let month_base = entry_on_or_before(series, today - Duration::days(30));
    let ytd_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    let ytd_base = series.iter().find(|point| point.date >= ytd_start);

    PeriodReturns {
        d1: latest.daily_return.filter(|r| r.is_finite()).or(fallback),
        w1: week_base.and_then(|base| return_from_base(latest.index, base.index)),
        m1: month_base.and_then(|base| return_from_base(latest.index, base.index)),
        ytd: ytd_base.and_then(|base| return_from_base(latest.index, base.index)),
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
    use crate::portfolio::snapshot::SnapshotPosition;
    use std::collections::BTreeMap;

    fn snapshot(date: &str, total: f64, positions: &[(&str, f64, f64)]) -> Snapshot {
        let positions: BTreeMap<String, SnapshotPosition> = positions
            .iter()
            .map(|(ticker, shares, price)| {
                (
                    ticker.to_string(),
                    SnapshotPosition {
                        shares: *shares,
                        price: *price,
                        value: shares * price,
                        ..SnapshotPosition::default()
                    },
                )
            })
            .collect();
        Snapshot {
            date: date.into(),
            total_value: total,
            positions,
        }
    }

    #[test]
    fn test_flow_from_buys_uses_current_price() {
        let prev = snapshot("2026-03-01", 1000.0, &[("AAPL", 5.0, 100.0)]);
        let curr = snapshot("2026-03-02", 1600.0, &[("AAPL", 10.0, 110.0)]);
        assert_eq!(external_flow_between(&prev, &curr), 550.0);
    }

    #[test]
    fn test_flow_falls_back_to_previous_price() {
        let prev = snapshot("2026-03-01", 1000.0, &[("AAPL", 10.0, 100.0)]);
        let curr = snapshot("2026-03-02", 500.0, &[("AAPL", 5.0, 0.0)]);
        assert_eq!(external_flow_between(&prev, &curr), -500.0);
    }

    #[test]
    fn test_flow_ignores_tiny_share_deltas() {
        let prev = snapshot("2026-03-01", 1000.0, &[("AAPL", 10.0, 100.0)]);
        let curr = snapshot("2026-03-02", 1000.0, &[("AAPL", 10.0 + 1e-12, 100.0)]);
        assert_eq!(external_flow_between(&prev, &curr), 0.0);
    }

    #[test]
    fn test_series_isolates_deposits_from_returns() {
        // Value doubles purely through a deposit; the return must be zero.
        let history = vec![
            snapshot("2026-03-01", 1000.0, &[("AAPL", 10.0, 100.0)]),
            snapshot("2026-03-02", 2000.0, &[("AAPL", 20.0, 100.0)]),
        ];
        let series = build_performance_series(&history);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].external_flow, 1000.0);
        assert_eq!(series[1].daily_return, Some(0.0));
        assert_eq!(series[1].index, 100.0);
    }

    #[test]
    fn test_series_index_compounds() {
        let history = vec![
            snapshot("2026-03-01", 1000.0, &[("AAPL", 10.0, 100.0)]),
            snapshot("2026-03-02", 1010.0, &[("AAPL", 10.0, 101.0)]),
            snapshot("2026-03-03", 1030.2, &[("AAPL", 10.0, 103.02)]),
        ];
        let series = build_performance_series(&history);
        assert!((series[1].daily_return.unwrap() - 0.01).abs() < 1e-12);
        assert!((series[2].index - 103.02).abs() < 1e-9);
    }

    #[test]
    fn test_series_carries_index_through_null_returns() {
        let history = vec![
            snapshot("2026-03-01", 1000.0, &[("AAPL", 10.0, 100.0)]),
            // Drop below -100% after flow adjustment leaves the return null.
            snapshot("2026-03-02", 1.0, &[("AAPL", 10.0, 0.1), ("NEW", 100.0, 20.0)]),
        ];
        let series = build_performance_series(&history);
        assert_eq!(series[1].daily_return, None);
        assert_eq!(series[1].index, 100.0);
    }

    #[test]
    fn test_return_from_base_guards() {
        assert!((return_from_base(110.0, 100.0).unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(return_from_base(110.0, 0.0), None);
        assert_eq!(return_from_base(110.0, -5.0), None);
        assert_eq!(return_from_base(f64::NAN, 100.0), None);
    }

    #[test]
    fn test_returns_fall_back_to_live_daily_pct() {
        let returns = returns_from_series(&[], Some(0.012), "2026-03-02".parse().unwrap());
        assert_eq!(returns.d1, Some(0.012));
        assert_eq!(returns.w1, None);
        assert_eq!(returns.ytd, None);
    }

    #[test]
    fn test_period_returns_use_index_bases() {
        let today: NaiveDate = "2026-03-10".parse().unwrap();
        let history = vec![
            snapshot("2026-01-02", 1000.0, &[("AAPL", 10.0, 100.0)]),
            snapshot("2026-02-05", 1100.0, &[("AAPL", 10.0, 110.0)]),
            snapshot("2026-03-02", 1210.0, &[("AAPL", 10.0, 121.0)]),
            snapshot("2026-03-09", 1331.0, &[("AAPL", 10.0, 133.1)]),
        ];
        let series = build_performance_series(&history);
        let returns = returns_from_series(&series, None, today);
        // Week base is 2026-03-02 (index 121), month base 2026-02-05 (110).
        assert!((returns.w1.unwrap() - 0.1).abs() < 1e-9);
        assert!((returns.m1.unwrap() - 0.21).abs() < 1e-9);
        // YTD base is the very first point of the year, index 100.
        assert!((returns.ytd.unwrap() - 0.331).abs() < 1e-9);
        assert!((returns.d1.unwrap() - 0.1).abs() < 1e-9);
    }
}
