//! Top-level load pipeline: pull the holdings sheet, normalize it into the
//! session, start the live-quote loop, and kick off the first frame.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use crate::constants::SAMPLE_CSV;
use crate::errors::Result;
use crate::holdings::{normalize_rows, parse_delimited, parse_history_csv, HistoryPoint};
use crate::quotes::QuoteIngester;
use crate::session::SessionContext;

/// Transport contract for the holdings sheet and the optional
/// portfolio-value history document.
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Label shown next to the data, e.g. `"Google Sheets (read-only)"`.
    fn label(&self) -> &str;

    async fn holdings_csv(&self) -> Result<String>;

    /// `None` when the source has no history document configured.
    async fn history_csv(&self) -> Result<Option<String>>;
}

/// Built-in source backed by the bundled sample rows.
pub struct SampleHoldingsSource;

#[async_trait]
impl HoldingsSource for SampleHoldingsSource {
    fn label(&self) -> &str {
        "Sample data"
    }

    async fn holdings_csv(&self) -> Result<String> {
        Ok(SAMPLE_CSV.to_string())
    }

    async fn history_csv(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// What a load run produced, for the source label and history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub source_label: String,
    pub row_count: usize,
    pub history: Vec<HistoryPoint>,
}

/// Owns the load pipeline over a session and its live-quote loop.
pub struct Dashboard {
    session: Arc<SessionContext>,
    source: Arc<dyn HoldingsSource>,
    ingester: Arc<QuoteIngester>,
}

impl Dashboard {
    pub fn new(
        session: Arc<SessionContext>,
        source: Arc<dyn HoldingsSource>,
        ingester: Arc<QuoteIngester>,
    ) -> Self {
        Dashboard {
            session,
            source,
            ingester,
        }
    }

    pub fn session(&self) -> Arc<SessionContext> {
        self.session.clone()
    }

    /// Loads holdings, seeds the session, schedules the first frame, and
    /// restarts the live loop. Unreachable or empty sheets fall back to the
    /// bundled sample with a downgraded label.
    pub async fn load(&self) -> LoadOutcome {
        let (csv, mut label) = match self.source.holdings_csv().await {
            Ok(csv) => (csv, self.source.label().to_string()),
            Err(err) => {
                debug!("Holdings fetch failed: {err}");
                (
                    SAMPLE_CSV.to_string(),
                    "Sample data (sheet unavailable)".to_string(),
                )
            }
        };

        let mut rows = normalize_rows(&parse_delimited(&csv));
        if rows.is_empty() && csv != SAMPLE_CSV {
            rows = normalize_rows(&parse_delimited(SAMPLE_CSV));
            label = "Sample data (sheet empty)".to_string();
        }
        rows.sort_by(|a, b| b.regular_value().total_cmp(&a.regular_value()));

        if rows.iter().any(|row| row.price > 0.0) {
            self.session.freshness.mark_prices(Utc::now());
        }
        let row_count = rows.len();
        self.session.replace_rows(rows).await;
        self.session.render.schedule();
        self.ingester.start();
        info!("Loaded {row_count} holdings from {label}");

        LoadOutcome {
            source_label: label,
            row_count,
            history: self.load_history().await,
        }
    }

    async fn load_history(&self) -> Vec<HistoryPoint> {
        match self.source.history_csv().await {
            Ok(Some(text)) => parse_history_csv(&text),
            Ok(None) => Vec::new(),
            Err(err) => {
                debug!("History fetch failed: {err}");
                Vec::new()
            }
        }
    }
}
