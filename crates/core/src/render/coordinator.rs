//! Drives frame composition: captures session state, persists today's
//! records behind the market-record signature guard, and hands the
//! composed frame to the sink.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use crate::advice::AdviceMode;
use crate::benchmarks::BenchmarkService;
use crate::holdings::{DisplayMode, DisplayRow};
use crate::news::{NewsFocus, NewsItem};
use crate::portfolio::{
    build_performance_series, display_rows, market_record_signature, portfolio_totals,
    regular_rows, SnapshotStore,
};
use crate::render::frame::{compose_frame, DashboardFrame, FrameInputs};
use crate::session::SessionContext;
use crate::utils::local_today;

/// Receives each composed frame. Implementations draw the page.
pub trait FrameSink: Send + Sync {
    fn present(&self, frame: &DashboardFrame);
}

/// Sink for headless use; frames are composed and dropped.
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn present(&self, _frame: &DashboardFrame) {}
}

const DEFAULT_TREEMAP_WIDTH: i64 = 1180;
const DEFAULT_TREEMAP_HEIGHT: i64 = 560;

pub struct RenderCoordinator {
    session: Arc<SessionContext>,
    snapshots: SnapshotStore,
    benchmarks: Arc<BenchmarkService>,
    sink: Arc<dyn FrameSink>,
    news: Vec<NewsItem>,
    news_focus: NewsFocus,
    advice_mode: AdviceMode,
    treemap_width: i64,
    treemap_height: i64,
    last_recorded_signature: Option<String>,
}

impl RenderCoordinator {
    pub fn new(
        session: Arc<SessionContext>,
        snapshots: SnapshotStore,
        benchmarks: Arc<BenchmarkService>,
        sink: Arc<dyn FrameSink>,
    ) -> Self {
        RenderCoordinator {
            session,
            snapshots,
            benchmarks,
            sink,
            news: Vec::new(),
            news_focus: NewsFocus::default(),
            advice_mode: AdviceMode::default(),
            treemap_width: DEFAULT_TREEMAP_WIDTH,
            treemap_height: DEFAULT_TREEMAP_HEIGHT,
            last_recorded_signature: None,
        }
    }

    pub fn set_news(&mut self, items: Vec<NewsItem>) {
        self.news = items;
        self.session.render.schedule();
    }

    pub fn set_news_focus(&mut self, focus: NewsFocus) {
        self.news_focus = focus;
        self.session.render.schedule();
    }

    pub fn set_advice_mode(&mut self, mode: AdviceMode) {
        self.advice_mode = mode;
        self.session.render.schedule();
    }

    pub fn set_viewport(&mut self, width: i64, height: i64) {
        self.treemap_width = width.max(1);
        self.treemap_height = height.max(1);
        self.session.render.schedule();
    }

    /// Upserts today's snapshot and daily P/L unless the market state is
    /// byte-identical to the last persisted one. Returns whether a write
    /// happened.
    pub fn persist_daily_records(&mut self, regular: &[DisplayRow], today: NaiveDate) -> bool {
        let totals = portfolio_totals(regular);
        let signature = format!(
            "{today}|{}|{:.4}|{:.4}",
            market_record_signature(regular),
            totals.total_value,
            totals.daily_change_value
        );
        if self.last_recorded_signature.as_deref() == Some(signature.as_str()) {
            return false;
        }
        self.snapshots
            .upsert_today_snapshot(regular, totals.total_value, today);
        self.snapshots.upsert_today_daily_pl(
            totals.daily_change_value,
            totals.daily_change_pct,
            today,
        );
        self.last_recorded_signature = Some(signature);
        true
    }

    /// Composes and presents one frame from the current session state.
    pub async fn render_frame(&mut self) -> DashboardFrame {
        let mode = self.session.display_mode();
        let rows = self.session.rows().await;
        let display = display_rows(&rows, mode);
        let regular = regular_rows(&rows);

        let today = local_today();
        let persisted = self.persist_daily_records(&regular, today);
        if persisted {
            debug!("Persisted daily records for {today}");
        }

        let history = self.snapshots.load_snapshots();
        let performance = build_performance_series(&history);
        let daily_pl = self.snapshots.load_daily_pl();
        let benchmarks = self.benchmarks.book().await;
        let now = Utc::now();

        let frame = compose_frame(FrameInputs {
            mode,
            display_rows: &display,
            performance: &performance,
            daily_pl: &daily_pl,
            benchmarks: &benchmarks,
            news: &self.news,
            news_focus: self.news_focus,
            advice_mode: self.advice_mode,
            freshness: self
                .session
                .freshness
                .report(now, mode == DisplayMode::Extended),
            treemap_width: self.treemap_width,
            treemap_height: self.treemap_height,
            today,
            now,
        });
        self.sink.present(&frame);
        frame
    }

    /// Drives frames until dropped: one composition per scheduler wake,
    /// plus a minute tick so freshness pills re-classify on their own.
    pub async fn run(mut self) {
        let session = self.session.clone();
        let mut minute = tokio::time::interval(std::time::Duration::from_secs(60));
        minute.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = session.render.due() => {
                    self.render_frame().await;
                }
                _ = minute.tick() => {
                    session.render.schedule();
                }
            }
        }
    }
}
