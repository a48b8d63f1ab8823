//! Shared state owned by one dashboard session: the canonical row list,
//! the live-loop generation counter, display mode, and channel freshness.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use tokio::sync::RwLock;

use crate::constants::PRICE_MODE_STORAGE_KEY;
use crate::freshness::FreshnessTracker;
use crate::holdings::{DisplayMode, Position};
use crate::render::RenderScheduler;
use crate::storage::KvStore;

pub struct SessionContext {
    rows: RwLock<Vec<Position>>,
    /// Generation stamp for the live-quote loop; bumped on every restart.
    run_id: AtomicU64,
    extended_mode: AtomicBool,
    pub freshness: FreshnessTracker,
    pub render: RenderScheduler,
    store: Arc<dyn KvStore>,
}

impl SessionContext {
    /// Starts a session over the given store, restoring the saved display
    /// mode when one exists.
    pub fn new(store: Arc<dyn KvStore>) -> Arc<Self> {
        let saved_mode = store
            .get(PRICE_MODE_STORAGE_KEY)
            .ok()
            .flatten()
            .map(|raw| DisplayMode::parse(&raw))
            .unwrap_or_default();
        Arc::new(SessionContext {
            rows: RwLock::new(Vec::new()),
            run_id: AtomicU64::new(0),
            extended_mode: AtomicBool::new(saved_mode == DisplayMode::Extended),
            freshness: FreshnessTracker::new(),
            render: RenderScheduler::new(),
            store,
        })
    }

    pub async fn rows(&self) -> Vec<Position> {
        self.rows.read().await.clone()
    }

    pub async fn replace_rows(&self, rows: Vec<Position>) {
        *self.rows.write().await = rows;
    }

    /// Mutates the canonical rows under the write lock.
    pub async fn with_rows_mut<R>(&self, mutate: impl FnOnce(&mut Vec<Position>) -> R) -> R {
        let mut rows = self.rows.write().await;
        mutate(&mut rows)
    }

    /// Starts a new live-loop generation and returns its id. Older loops
    /// observe the bump and stop touching shared state.
    pub fn begin_run(&self) -> u64 {
        self.run_id.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current_run(&self) -> u64 {
        self.run_id.load(Ordering::Acquire)
    }

    pub fn display_mode(&self) -> DisplayMode {
        if self.extended_mode.load(Ordering::Acquire) {
            DisplayMode::Extended
        } else {
            DisplayMode::Regular
        }
    }

    /// Switches the display mode, persists the preference, and optionally
    /// schedules a frame.
    pub fn set_display_mode(&self, mode: DisplayMode, schedule_render: bool) {
        self.extended_mode
            .store(mode == DisplayMode::Extended, Ordering::Release);
        if let Err(err) = self.store.set(PRICE_MODE_STORAGE_KEY, mode.as_str()) {
            warn!("Failed to persist display mode: {err}");
        }
        if schedule_render {
            self.render.schedule();
        }
    }

    pub fn store(&self) -> Arc<dyn KvStore> {
        self.store.clone()
    }
}
