//! News digest: feed contract, dedupe, focus filter, and the
//! freshness-plus-popularity ranking.

mod feed;
mod model;
mod ranker;

pub use feed::{strip_html, summarize_text, NewsFeedSource};
pub use model::{NewsFocus, NewsItem, RankedNewsItem};
pub use ranker::{
    build_news_digest, classify_focus, dedupe_items, filter_by_focus, freshness_score,
    normalize_title_key, popularity_score, rank_items, safe_http_url,
};
