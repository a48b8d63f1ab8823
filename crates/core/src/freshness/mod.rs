//! Data-channel freshness: classifies prices, benchmarks, and news by the
//! age of their last successful update.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::utils::format_relative_age;

/// Freshness state of a data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessClass {
    Fresh,
    Delayed,
    Stale,
}

impl FreshnessClass {
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessClass::Fresh => "Fresh",
            FreshnessClass::Delayed => "Delayed",
            FreshnessClass::Stale => "Stale",
        }
    }
}

/// Age bounds, in minutes, separating fresh from delayed from stale.
#[derive(Debug, Clone, Copy)]
pub struct ChannelThresholds {
    pub fresh_minutes: f64,
    pub delayed_minutes: f64,
}

pub const PRICES_THRESHOLDS: ChannelThresholds = ChannelThresholds {
    fresh_minutes: 10.0,
    delayed_minutes: 60.0,
};

pub const BENCHMARKS_THRESHOLDS: ChannelThresholds = ChannelThresholds {
    fresh_minutes: 120.0,
    delayed_minutes: 720.0,
};

pub const NEWS_THRESHOLDS: ChannelThresholds = ChannelThresholds {
    fresh_minutes: 45.0,
    delayed_minutes: 240.0,
};

/// A channel that has never updated is stale; otherwise the age decides.
pub fn classify(
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: ChannelThresholds,
) -> FreshnessClass {
    let Some(updated_at) = updated_at else {
        return FreshnessClass::Stale;
    };
    let age_minutes = (now - updated_at).num_seconds().max(0) as f64 / 60.0;
    if age_minutes <= thresholds.fresh_minutes {
        FreshnessClass::Fresh
    } else if age_minutes <= thresholds.delayed_minutes {
        FreshnessClass::Delayed
    } else {
        FreshnessClass::Stale
    }
}

/// One channel's line on the status strip, e.g. `Prices: Fresh (2m ago)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStatus {
    pub label: String,
    pub class: FreshnessClass,
    pub age: String,
}

impl ChannelStatus {
    pub fn text(&self) -> String {
        format!("{}: {} ({})", self.label, self.class.label(), self.age)
    }
}

/// Freshness of all three channels at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct FreshnessReport {
    pub prices: ChannelStatus,
    pub benchmarks: ChannelStatus,
    pub news: ChannelStatus,
}

/// Lock-free timestamps of the last successful update per channel.
///
/// Stored as epoch milliseconds; zero means never updated.
#[derive(Debug, Default)]
pub struct FreshnessTracker {
    prices_ms: AtomicI64,
    benchmarks_ms: AtomicI64,
    news_ms: AtomicI64,
}

impl FreshnessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_prices(&self, at: DateTime<Utc>) {
        self.prices_ms.store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn mark_benchmarks(&self, at: DateTime<Utc>) {
        self.benchmarks_ms.store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn mark_news(&self, at: DateTime<Utc>) {
        self.news_ms.store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn prices_updated_at(&self) -> Option<DateTime<Utc>> {
        load_timestamp(&self.prices_ms)
    }

    pub fn benchmarks_updated_at(&self) -> Option<DateTime<Utc>> {
        load_timestamp(&self.benchmarks_ms)
    }

    pub fn news_updated_at(&self) -> Option<DateTime<Utc>> {
        load_timestamp(&self.news_ms)
    }

    /// Builds the status strip; the prices label names the active session.
    pub fn report(&self, now: DateTime<Utc>, extended_mode: bool) -> FreshnessReport {
        let price_label = if extended_mode {
            "Prices (extended)"
        } else {
            "Prices (regular)"
        };
        FreshnessReport {
            prices: status(price_label, self.prices_updated_at(), now, PRICES_THRESHOLDS),
            benchmarks: status(
                "Benchmarks",
                self.benchmarks_updated_at(),
                now,
                BENCHMARKS_THRESHOLDS,
            ),
            news: status("News", self.news_updated_at(), now, NEWS_THRESHOLDS),
        }
    }
}

fn status(
    label: &str,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: ChannelThresholds,
) -> ChannelStatus {
    ChannelStatus {
        label: label.to_string(),
        class: classify(updated_at, now, thresholds),
        age: format_relative_age(updated_at, now),
    }
}

fn load_timestamp(cell: &AtomicI64) -> Option<DateTime<Utc>> {
    let ms = cell.load(Ordering::Relaxed);
    if ms == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).unwrap()
    }

    #[test]
    fn test_never_updated_is_stale() {
        assert_eq!(classify(None, now(), PRICES_THRESHOLDS), FreshnessClass::Stale);
    }

    #[test]
    fn test_classify_boundaries() {
        let now = now();
        let fresh = now - Duration::minutes(10);
        let delayed = now - Duration::minutes(11);
        let stale = now - Duration::minutes(61);
        assert_eq!(classify(Some(fresh), now, PRICES_THRESHOLDS), FreshnessClass::Fresh);
        assert_eq!(classify(Some(delayed), now, PRICES_THRESHOLDS), FreshnessClass::Delayed);
        assert_eq!(classify(Some(stale), now, PRICES_THRESHOLDS), FreshnessClass::Stale);
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let now = now();
        let future = now + Duration::minutes(5);
        assert_eq!(classify(Some(future), now, NEWS_THRESHOLDS), FreshnessClass::Fresh);
    }

    #[test]
    fn test_tracker_report_labels() {
        let tracker = FreshnessTracker::new();
        tracker.mark_prices(now() - Duration::minutes(2));
        let report = tracker.report(now(), true);
        assert_eq!(report.prices.label, "Prices (extended)");
        assert_eq!(report.prices.class, FreshnessClass::Fresh);
        assert_eq!(report.prices.text(), "Prices (extended): Fresh (2m ago)");
        assert_eq!(report.news.class, FreshnessClass::Stale);
        assert_eq!(report.news.age, "never");
    }
}
