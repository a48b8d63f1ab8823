//! Benchmark context: SPY/QQQ EOD series, their period returns, and the
//! aligned portfolio-vs-benchmark curve.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use log::debug;
use pulse_market_data::{EodClose, EodSeriesProvider};
use tokio::sync::RwLock;

use crate::constants::BENCHMARK_SYMBOLS;
use crate::portfolio::{return_from_base, PeriodReturns, SeriesPoint};
use crate::session::SessionContext;

const CURVE_WINDOW_DAYS: i64 = 90;
const CURVE_MIN_POINTS: usize = 8;

/// Period returns computed over an EOD close series.
///
/// `d1` compares the last two closes; week and month bases are the latest
/// closes at or before the last date minus 7 and 30 days; the YTD base is
/// the first close of the last date's year.
pub fn benchmark_returns(series: &[EodClose]) -> PeriodReturns {
    let Some(last) = series.last() else {
        return PeriodReturns::default();
    };
    let prev = series.len().checked_sub(2).and_then(|idx| series.get(idx));
    let week_base = close_on_or_before(series, last.date - Duration::days(7));
    let month_base = close_on_or_before(series, last.date - Duration::days(30));
    let ytd_start = NaiveDate::from_ymd_opt(last.date.year(), 1, 1).unwrap_or(last.date);
    let ytd_base = series.iter().find(|point| point.date >= ytd_start);

    PeriodReturns {
        d1: prev.and_then(|p| return_from_base(last.close, p.close)),
        w1: week_base.and_then(|p| return_from_base(last.close, p.close)),
        m1: month_base.and_then(|p| return_from_base(last.close, p.close)),
        ytd: ytd_base.and_then(|p| return_from_base(last.close, p.close)),
    }
}

fn close_on_or_before(series: &[EodClose], target: NaiveDate) -> Option<&EodClose> {
    series.iter().rev().find(|point| point.date <= target)
}

fn index_on_or_before(series: &[SeriesPoint], target: NaiveDate) -> Option<f64> {
    series
        .iter()
        .rev()
        .find(|point| point.date <= target)
        .map(|point| point.index)
}

/// Portfolio index and both benchmarks aligned on shared dates and rebased
/// to 100 at the window start.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkCurve {
    pub dates: Vec<NaiveDate>,
    pub portfolio: Vec<f64>,
    pub spy: Vec<f64>,
    pub qqq: Vec<f64>,
}

/// Builds the comparison curve over the trailing 90 days.
///
/// Every date any of the three series knows about becomes a sample; each
/// series contributes its latest value at or before that date. Returns
/// `None` when fewer than eight aligned points exist.
pub fn build_benchmark_curve(
    portfolio: &[SeriesPoint],
    spy: &[EodClose],
    qqq: &[EodClose],
    today: NaiveDate,
) -> Option<BenchmarkCurve> {
    let p_first = portfolio.first()?.date;
    let spy_first = spy.first()?.date;
    let qqq_first = qqq.first()?.date;
    let window_start = today - Duration::days(CURVE_WINDOW_DAYS);
    let start = p_first.max(spy_first).max(qqq_first).max(window_start);

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    dates.extend(portfolio.iter().map(|p| p.date).filter(|d| *d >= start));
    dates.extend(spy.iter().map(|p| p.date).filter(|d| *d >= start));
    dates.extend(qqq.iter().map(|p| p.date).filter(|d| *d >= start));

    let mut points: Vec<(NaiveDate, f64, f64, f64)> = Vec::new();
    for date in dates {
        let p_val = index_on_or_before(portfolio, date);
        let spy_val = close_on_or_before(spy, date).map(|p| p.close);
        let qqq_val = close_on_or_before(qqq, date).map(|p| p.close);
        if let (Some(p), Some(s), Some(q)) = (p_val, spy_val, qqq_val) {
            if p.is_finite() && s.is_finite() && q.is_finite() {
                points.push((date, p, s, q));
            }
        }
    }
    if points.len() < CURVE_MIN_POINTS {
        return None;
    }

    let window = points.len().saturating_sub(CURVE_WINDOW_DAYS as usize);
    let sliced = &points[window..];
    let (_, p_base, s_base, q_base) = sliced[0];
    Some(BenchmarkCurve {
        dates: sliced.iter().map(|(d, ..)| *d).collect(),
        portfolio: sliced.iter().map(|(_, p, ..)| p / p_base * 100.0).collect(),
        spy: sliced.iter().map(|(_, _, s, _)| s / s_base * 100.0).collect(),
        qqq: sliced.iter().map(|(_, _, _, q)| q / q_base * 100.0).collect(),
    })
}

/// Latest benchmark data kept for the render loop.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkBook {
    pub series: HashMap<String, Vec<EodClose>>,
    pub returns: HashMap<String, PeriodReturns>,
}

impl BenchmarkBook {
    pub fn series_for(&self, symbol: &str) -> &[EodClose] {
        self.series.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn returns_for(&self, symbol: &str) -> PeriodReturns {
        self.returns.get(symbol).copied().unwrap_or_default()
    }
}

/// Fetches benchmark EOD series and keeps the shared book current.
pub struct BenchmarkService {
    session: Arc<SessionContext>,
    provider: Arc<dyn EodSeriesProvider>,
    book: RwLock<BenchmarkBook>,
}

impl BenchmarkService {
    pub fn new(session: Arc<SessionContext>, provider: Arc<dyn EodSeriesProvider>) -> Self {
        BenchmarkService {
            session,
            provider,
            book: RwLock::new(BenchmarkBook::default()),
        }
    }

    /// Refreshes every tracked symbol. Any symbol that yields data stamps
    /// the benchmarks channel and schedules a frame; failed symbols keep
    /// their previous series.
    pub async fn refresh(&self) {
        let mut any_updated = false;
        for symbol in BENCHMARK_SYMBOLS {
            match self.provider.daily_closes(symbol).await {
                Ok(series) if !series.is_empty() => {
                    let mut book = self.book.write().await;
                    book.returns.insert(symbol.to_string(), benchmark_returns(&series));
                    book.series.insert(symbol.to_string(), series);
                    any_updated = true;
                }
                Ok(_) => debug!("{symbol} benchmark series came back empty"),
                Err(err) => debug!("{symbol} benchmark fetch failed: {err}"),
            }
        }
        if any_updated {
            self.session.freshness.mark_benchmarks(Utc::now());
            self.session.render.schedule();
        }
    }

    pub async fn book(&self) -> BenchmarkBook {
        self.book.read().await.clone()
    }
}
