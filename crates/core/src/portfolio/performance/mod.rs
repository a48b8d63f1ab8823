//! External-flow-adjusted daily returns and the cumulative performance
//! index reconstructed from the snapshot history.

mod performance_model;
mod performance_service;

pub use performance_model::{PeriodReturns, SeriesPoint};
pub use performance_service::{
    build_performance_series, external_flow_between, return_from_base, returns_from_series,
};
