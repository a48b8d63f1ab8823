//! Live-quote ingestion: periodic multi-provider refresh with rate-limit
//! backoff and generation-stamped cancellation.

mod apply;
mod backoff;
mod ingester;

pub use apply::{apply_basic_quotes, apply_extended_quotes, live_symbols};
pub use backoff::BackoffPolicy;
pub use ingester::{QuoteIngester, TickOutcome};
