use std::sync::Arc;

use chrono::Utc;
use log::debug;
use pulse_market_data::BatchQuoteProvider;

use crate::quotes::{apply_basic_quotes, apply_extended_quotes, live_symbols, BackoffPolicy};
use crate::session::SessionContext;

/// Result of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// At least one row was touched; a render was scheduled.
    Updated,
    /// Providers answered but nothing matched the portfolio.
    NoData,
    /// A provider signalled rate limiting; the loop backs off.
    RateLimited,
    /// A newer loop generation took over; nothing was mutated.
    Cancelled,
}

/// Periodic live-quote refresh over the shared session rows.
///
/// The extended-hours provider is tried first; the plain batch provider is
/// the fallback. Each spawned loop carries the generation id it was started
/// with and exits as soon as a newer generation exists, checking between
/// every side-effecting step.
pub struct QuoteIngester {
    session: Arc<SessionContext>,
    extended: Arc<dyn BatchQuoteProvider>,
    fallback: Arc<dyn BatchQuoteProvider>,
}

impl QuoteIngester {
    pub fn new(
        session: Arc<SessionContext>,
        extended: Arc<dyn BatchQuoteProvider>,
        fallback: Arc<dyn BatchQuoteProvider>,
    ) -> Self {
        QuoteIngester {
            session,
            extended,
            fallback,
        }
    }

    /// Starts a fresh live loop and returns its generation id. Any loop
    /// started earlier stops at its next generation check.
    pub fn start(self: &Arc<Self>) -> u64 {
        let run_id = self.session.begin_run();
        let ingester = self.clone();
        tokio::spawn(async move {
            ingester.run(run_id).await;
        });
        run_id
    }

    async fn run(&self, run_id: u64) {
        let mut backoff = BackoffPolicy::new();
        loop {
            let outcome = self.tick(run_id).await;
            if outcome == TickOutcome::Cancelled {
                return;
            }
            let delay = match outcome {
                TickOutcome::RateLimited => backoff.on_rate_limited(),
                _ => backoff.reset(),
            };
            tokio::time::sleep(delay).await;
            if self.session.current_run() != run_id {
                return;
            }
        }
    }

    /// One refresh attempt. Generation is re-checked after every await so a
    /// stale tick never mutates rows or timestamps.
    pub async fn tick(&self, run_id: u64) -> TickOutcome {
        if self.session.current_run() != run_id {
            return TickOutcome::Cancelled;
        }
        let symbols = live_symbols(&self.session.rows().await);
        if symbols.is_empty() {
            return TickOutcome::NoData;
        }

        match self.extended.fetch_batch(&symbols).await {
            Ok(quotes) if !quotes.is_empty() => {
                if self.session.current_run() != run_id {
                    return TickOutcome::Cancelled;
                }
                let updated = self
                    .session
                    .with_rows_mut(|rows| apply_extended_quotes(rows, &quotes))
                    .await;
                if updated {
                    return self.commit_update(run_id);
                }
            }
            Ok(_) => {}
            Err(err) if err.is_rate_limited() => return TickOutcome::RateLimited,
            Err(err) => debug!("{} batch quote failed: {err}", self.extended.id()),
        }

        if self.session.current_run() != run_id {
            return TickOutcome::Cancelled;
        }
        match self.fallback.fetch_batch(&symbols).await {
            Ok(quotes) => {
                if self.session.current_run() != run_id {
                    return TickOutcome::Cancelled;
                }
                let updated = self
                    .session
                    .with_rows_mut(|rows| apply_basic_quotes(rows, &quotes))
                    .await;
                if updated {
                    self.commit_update(run_id)
                } else {
                    TickOutcome::NoData
                }
            }
            Err(err) if err.is_rate_limited() => TickOutcome::RateLimited,
            Err(err) => {
                debug!("{} batch quote failed: {err}", self.fallback.id());
                TickOutcome::NoData
            }
        }
    }

    // Timestamp before scheduling, so the frame sees fresh prices.
    fn commit_update(&self, run_id: u64) -> TickOutcome {
        if self.session.current_run() != run_id {
            return TickOutcome::Cancelled;
        }
        self.session.freshness.mark_prices(Utc::now());
        self.session.render.schedule();
        TickOutcome::Updated
    }
}
