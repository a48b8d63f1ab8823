use chrono::NaiveDate;

/// One reconstructed day of portfolio performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total_value: f64,
    /// Flow-adjusted return against the previous snapshot; `None` when the
    /// previous value was unusable or the computed return was ≤ −100%.
    pub daily_return: Option<f64>,
    /// Net cash moved in (positive) or out (negative) between snapshots.
    pub external_flow: f64,
    /// Cumulative product of `1 + dailyReturn`, 100 on the first snapshot.
    pub index: f64,
}

/// 1-day / 1-week / 1-month / year-to-date portfolio returns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodReturns {
    pub d1: Option<f64>,
    pub w1: Option<f64>,
    pub m1: Option<f64>,
    pub ytd: Option<f64>,
}
