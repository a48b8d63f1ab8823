//! Portfolio Pulse dashboard core.
//!
//! Everything between the raw holdings sheet and a drawn page lives here:
//!
//! - [`holdings`]: CSV decoding and row normalization
//! - [`portfolio`]: display rows, exposure, snapshots, performance series
//! - [`quotes`]: the live-quote refresh loop with backoff and generation
//!   cancellation
//! - [`news`]: the headline digest ranker
//! - [`treemap`]: heat-map partitioning, text-fit, and colouring
//! - [`benchmarks`]: SPY/QQQ context and the rebased comparison curve
//! - [`render`]: single-flight frame scheduling and composition
//! - [`freshness`]: per-channel data-age classification
//! - [`dashboard`]: the load pipeline tying it all together
//!
//! Network access is behind the provider contracts of `pulse-market-data`;
//! persistence is behind [`storage::KvStore`].

pub mod advice;
pub mod benchmarks;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod freshness;
pub mod holdings;
pub mod news;
pub mod portfolio;
pub mod quotes;
pub mod render;
pub mod session;
pub mod storage;
pub mod treemap;
pub mod utils;

pub use dashboard::{Dashboard, HoldingsSource, LoadOutcome, SampleHoldingsSource};
pub use errors::{Error, Result};
pub use render::{DashboardFrame, FrameSink, RenderCoordinator};
pub use session::SessionContext;
