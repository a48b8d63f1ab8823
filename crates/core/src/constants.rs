//! Shared constants for the dashboard core.

use std::time::Duration;

// === Live price refresh ===

/// Base interval between live price ticks.
pub const LIVE_PRICE_REFRESH: Duration = Duration::from_secs(60);

/// Upper bound for the rate-limit backoff.
pub const LIVE_PRICE_MAX_BACKOFF: Duration = Duration::from_secs(5 * 60);

// === Persistent store ===

/// Key for the daily P/L history.
pub const DAILY_PL_STORAGE_KEY: &str = "portfolio_pulse_daily_pl_v1";

/// Maximum number of persisted daily P/L entries.
pub const DAILY_PL_HISTORY_LIMIT: usize = 400;

/// Key for the portfolio snapshot history.
pub const PORTFOLIO_HISTORY_STORAGE_KEY: &str = "portfolio_pulse_portfolio_history_v1";

/// Maximum number of persisted portfolio snapshots.
pub const PORTFOLIO_HISTORY_LIMIT: usize = 520;

/// Key for the theme preference (opaque token).
pub const THEME_STORAGE_KEY: &str = "portfolio_pulse_theme_v1";

/// Key for the display-mode preference.
pub const PRICE_MODE_STORAGE_KEY: &str = "portfolio_pulse_price_mode_v1";

// === Views ===

/// First date shown on the daily P/L calendar.
pub const DAILY_CALENDAR_START_ISO: &str = "2026-02-01";

/// Benchmark symbols tracked next to the portfolio.
pub const BENCHMARK_SYMBOLS: [&str; 2] = ["SPY", "QQQ"];

/// Number of headlines kept in the news digest.
pub const NEWS_DIGEST_SIZE: usize = 5;

/// Synthetic sector name that crypto rows collapse into.
pub const DIGITAL_ASSETS_SECTOR: &str = "Digital Assets";

/// Sector assigned to rows without one.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Ticker sentinel that marks a cash position.
pub const CASH_TICKER: &str = "CASH";

// === Fallback data ===

/// Built-in sample holdings, used when the sheet is unreachable or empty.
pub const SAMPLE_CSV: &str = "\
ticket,shares,price,daily change %
NVDA,100,765.42,1.1%
AAPL,50,183.27,-0.4%
MSFT,20,421.88,0.8%
AMZN,12,162.55,0.5%
TSLA,8,192.13,-1.6%";
