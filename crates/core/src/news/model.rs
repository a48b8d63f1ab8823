use chrono::{DateTime, Utc};

/// One headline as delivered by a feed source.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    /// Human-readable source label, e.g. `Reuters Business`.
    pub source: String,
    pub title: String,
    /// Plain-text summary, HTML stripped and truncated.
    pub summary: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A scored headline, ready for the digest.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNewsItem {
    pub item: NewsItem,
    pub score: i64,
}

/// Focus filter for the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsFocus {
    Macro,
    Earnings,
    Tech,
    #[default]
    All,
}

impl NewsFocus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsFocus::Macro => "macro",
            NewsFocus::Earnings => "earnings",
            NewsFocus::Tech => "tech",
            NewsFocus::All => "all",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "macro" => NewsFocus::Macro,
            "earnings" => NewsFocus::Earnings,
            "tech" => NewsFocus::Tech,
            _ => NewsFocus::All,
        }
    }
}
