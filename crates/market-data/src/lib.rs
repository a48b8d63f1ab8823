//! Market data providers for the Portfolio Pulse dashboard.
//!
//! This crate contains everything that talks to external quote sources:
//!
//! - [`provider::BatchQuoteProvider`]: batch quote fetching (extended-hours
//!   capable primary, keyed fallback)
//! - [`provider::EodSeriesProvider`]: daily benchmark close series
//! - [`proxy`]: CORS-proxy fallback fetching shared by all providers
//!
//! The dashboard core treats every provider as a black box returning
//! [`models::BatchQuote`] records; matching quotes to holdings and applying
//! them to rows happens in `pulse-core`.

pub mod errors;
pub mod models;
pub mod provider;
pub mod proxy;

pub use errors::MarketDataError;
pub use models::{BatchQuote, EodClose};
pub use provider::{BatchQuoteProvider, EodSeriesProvider};
