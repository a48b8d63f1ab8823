//! One consistent view of the dashboard, composed from captured state.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::advice::{generate_advice, AdviceMode};
use crate::benchmarks::{build_benchmark_curve, BenchmarkBook, BenchmarkCurve};
use crate::constants::{BENCHMARK_SYMBOLS, DAILY_CALENDAR_START_ISO};
use crate::freshness::FreshnessReport;
use crate::holdings::{DisplayMode, DisplayRow};
use crate::news::{build_news_digest, NewsFocus, NewsItem, RankedNewsItem};
use crate::portfolio::snapshot::DailyPlEntry;
use crate::portfolio::{
    portfolio_exposure, portfolio_totals, returns_from_series, sorted_rows, PeriodReturns,
    PortfolioExposure, SeriesPoint, SortDirection, SortKey,
};
use crate::treemap::{
    build_treemap_items, calendar_cell_color, layout_visible_items, TreemapLayout,
};
use crate::utils::format_compact_amount;

/// Headline numbers at the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_value: f64,
    pub daily_change_value: f64,
    pub daily_change_pct: f64,
    pub returns: PeriodReturns,
    pub cash_pct: f64,
    pub crypto_pct: f64,
}

/// One day of the P/L calendar. `pl` is absent on days without a record.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    pub pl: Option<f64>,
    pub fill: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub title: String,
    /// Blank cells before the 1st so the grid starts on Sunday.
    pub leading_blanks: u32,
    pub cells: Vec<CalendarCell>,
}

/// Daily P/L calendar covering every month from the calendar start to the
/// latest recorded day. Empty `months` means no history yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarPanel {
    pub daily_change_value: f64,
    pub daily_change_pct: f64,
    pub months: Vec<CalendarMonth>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub symbol: String,
    pub returns: PeriodReturns,
}

/// Portfolio returns next to each benchmark, plus the rebased 90-day curve
/// when enough aligned history exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchmarkPanel {
    pub portfolio: PeriodReturns,
    pub rows: Vec<BenchmarkRow>,
    pub curve: Option<BenchmarkCurve>,
}

/// Everything a sink needs to draw the page once.
#[derive(Debug, Clone)]
pub struct DashboardFrame {
    pub mode: DisplayMode,
    pub summary: SummaryMetrics,
    pub table_rows: Vec<DisplayRow>,
    pub treemap: TreemapLayout,
    pub treemap_breadcrumb: String,
    pub exposure: PortfolioExposure,
    pub calendar: CalendarPanel,
    pub performance: Vec<SeriesPoint>,
    pub benchmarks: BenchmarkPanel,
    pub news: Vec<RankedNewsItem>,
    pub advice: Vec<String>,
    pub freshness: FreshnessReport,
}

/// State captured by the coordinator before composing a frame.
pub struct FrameInputs<'a> {
    pub mode: DisplayMode,
    pub display_rows: &'a [DisplayRow],
    pub performance: &'a [SeriesPoint],
    pub daily_pl: &'a [DailyPlEntry],
    pub benchmarks: &'a BenchmarkBook,
    pub news: &'a [NewsItem],
    pub news_focus: NewsFocus,
    pub advice_mode: AdviceMode,
    pub freshness: FreshnessReport,
    pub treemap_width: i64,
    pub treemap_height: i64,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

pub fn compose_frame(inputs: FrameInputs<'_>) -> DashboardFrame {
    let totals = portfolio_totals(inputs.display_rows);
    let returns = returns_from_series(inputs.performance, Some(totals.daily_change_pct), inputs.today);
    let exposure = portfolio_exposure(inputs.display_rows);

    let items = build_treemap_items(inputs.display_rows);
    let treemap = layout_visible_items(&items, inputs.treemap_width, inputs.treemap_height);
    let treemap_breadcrumb = breadcrumb_text(items.len(), treemap.tiles.len());

    let news = build_news_digest(inputs.news.to_vec(), inputs.news_focus, inputs.now);
    let advice = generate_advice(inputs.display_rows, inputs.news, inputs.advice_mode);

    DashboardFrame {
        mode: inputs.mode,
        summary: SummaryMetrics {
            total_value: totals.total_value,
            daily_change_value: totals.daily_change_value,
            daily_change_pct: totals.daily_change_pct,
            returns,
            cash_pct: exposure.cash_pct,
            crypto_pct: exposure.crypto_pct,
        },
        table_rows: sorted_rows(inputs.display_rows, SortKey::Value, SortDirection::Desc),
        treemap,
        treemap_breadcrumb,
        exposure,
        calendar: build_calendar_panel(
            inputs.daily_pl,
            totals.daily_change_value,
            totals.daily_change_pct,
        ),
        performance: inputs.performance.to_vec(),
        benchmarks: build_benchmark_panel(inputs.benchmarks, returns, inputs.performance, inputs.today),
        news,
        advice,
        freshness: inputs.freshness,
    }
}

fn breadcrumb_text(item_count: usize, visible_count: usize) -> String {
    if visible_count == 0 && item_count > 0 {
        "No tiles fit this viewport".to_string()
    } else if visible_count < item_count {
        format!("Visible Stocks ({visible_count} of {item_count})")
    } else {
        format!("All Stocks ({item_count})")
    }
}

fn calendar_start() -> NaiveDate {
    DAILY_CALENDAR_START_ISO
        .parse()
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(2026, 2, 1).unwrap_or_default())
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Builds the month grids from the persisted daily P/L history. Only
/// entries on or after the calendar start participate; cell colour scales
/// against the largest absolute P/L in that window.
pub fn build_calendar_panel(
    history: &[DailyPlEntry],
    daily_change_value: f64,
    daily_change_pct: f64,
) -> CalendarPanel {
    let start = calendar_start();
    let entries: Vec<(NaiveDate, f64)> = history
        .iter()
        .filter_map(|entry| {
            let date: NaiveDate = entry.date.parse().ok()?;
            (date >= start).then_some((date, entry.pl))
        })
        .collect();

    let mut panel = CalendarPanel {
        daily_change_value,
        daily_change_pct,
        months: Vec::new(),
    };
    let Some(last_date) = entries.iter().map(|(date, _)| *date).max() else {
        return panel;
    };
    let max_abs = entries
        .iter()
        .map(|(_, pl)| pl.abs())
        .fold(0.0_f64, f64::max);

    let mut cursor = month_start(start);
    let anchor = month_start(last_date);
    while cursor <= anchor {
        let end = next_month(cursor);
        let days = (end - cursor).num_days() as u32;
        let cells = (1..=days)
            .filter_map(|day| cursor.with_day(day))
            .map(|date| {
                let pl = entries
                    .iter()
                    .find(|(entry_date, _)| *entry_date == date)
                    .map(|(_, pl)| *pl)
                    .filter(|pl| pl.is_finite());
                CalendarCell {
                    date,
                    day: date.day(),
                    pl,
                    fill: pl.map(|pl| calendar_cell_color(pl, max_abs)),
                    amount: pl.map(format_compact_amount),
                }
            })
            .collect();
        panel.months.push(CalendarMonth {
            title: cursor.format("%B %Y").to_string(),
            leading_blanks: cursor.weekday().num_days_from_sunday(),
            cells,
        });
        cursor = end;
    }
    panel
}

fn build_benchmark_panel(
    book: &BenchmarkBook,
    portfolio_returns: PeriodReturns,
    performance: &[SeriesPoint],
    today: NaiveDate,
) -> BenchmarkPanel {
    let rows = BENCHMARK_SYMBOLS
        .iter()
        .map(|symbol| BenchmarkRow {
            symbol: symbol.to_string(),
            returns: book.returns_for(symbol),
        })
        .collect();
    let curve = build_benchmark_curve(
        performance,
        book.series_for(BENCHMARK_SYMBOLS[0]),
        book.series_for(BENCHMARK_SYMBOLS[1]),
        today,
    );
    BenchmarkPanel {
        portfolio: portfolio_returns,
        rows,
        curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, pl: f64) -> DailyPlEntry {
        DailyPlEntry {
            date: date.into(),
            pl,
            pct: 0.0,
        }
    }

    #[test]
    fn test_calendar_empty_without_history() {
        let panel = build_calendar_panel(&[], 12.0, 0.001);
        assert!(panel.months.is_empty());
        assert_eq!(panel.daily_change_value, 12.0);
    }

    #[test]
    fn test_calendar_ignores_entries_before_start() {
        let panel = build_calendar_panel(&[entry("2026-01-15", 50.0)], 0.0, 0.0);
        assert!(panel.months.is_empty());
    }

    #[test]
    fn test_calendar_spans_start_through_anchor_month() {
        let history = vec![entry("2026-02-03", 120.0), entry("2026-04-10", -80.0)];
        let panel = build_calendar_panel(&history, 0.0, 0.0);
        assert_eq!(panel.months.len(), 3);
        assert_eq!(panel.months[0].title, "February 2026");
        assert_eq!(panel.months[2].title, "April 2026");
        // 2026-02-01 is a Sunday.
        assert_eq!(panel.months[0].leading_blanks, 0);
        assert_eq!(panel.months[0].cells.len(), 28);

        let feb3 = &panel.months[0].cells[2];
        assert_eq!(feb3.pl, Some(120.0));
        assert!(feb3.fill.is_some());
        assert_eq!(feb3.amount.as_deref(), Some("+$120"));

        let feb4 = &panel.months[0].cells[3];
        assert_eq!(feb4.pl, None);
        assert!(feb4.fill.is_none());
    }

    #[test]
    fn test_breadcrumb_variants() {
        assert_eq!(breadcrumb_text(5, 5), "All Stocks (5)");
        assert_eq!(breadcrumb_text(5, 3), "Visible Stocks (3 of 5)");
        assert_eq!(breadcrumb_text(5, 0), "No tiles fit this viewport");
    }
}
