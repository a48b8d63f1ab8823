use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::constants::NEWS_DIGEST_SIZE;
use crate::news::{NewsFocus, NewsItem, RankedNewsItem};

lazy_static! {
    static ref MACRO_FOCUS_REGEX: Regex =
        Regex::new(r"(fed|inflation|interest rate|rates|treasury|yield|jobs|payroll|cpi|pce)")
            .expect("Invalid regex pattern");
    static ref EARNINGS_FOCUS_REGEX: Regex =
        Regex::new(r"(earnings|guidance|quarter|q1|q2|q3|q4|revenue|eps)")
            .expect("Invalid regex pattern");
    static ref TECH_FOCUS_REGEX: Regex =
        Regex::new(r"(ai|chip|semiconductor|software|cloud|apple|microsoft|nvidia|google|amazon|meta|tesla)")
            .expect("Invalid regex pattern");
    static ref BREAKING_REGEX: Regex =
        Regex::new(r"(breaking|just in|developing|live|exclusive|alert)")
            .expect("Invalid regex pattern");
    static ref MARKET_MOVER_REGEX: Regex =
        Regex::new(r"(fed|federal reserve|rate cut|rate hike|cpi|inflation|payroll|jobs report|treasury|yield|earnings|guidance|dow|s&p|nasdaq)")
            .expect("Invalid regex pattern");
    static ref IMPACT_REGEX: Regex =
        Regex::new(r"(%|plunge|surge|rally|selloff|record high|record low)")
            .expect("Invalid regex pattern");
    static ref TITLE_KEY_REGEX: Regex =
        Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern");
}

/// Buckets a headline by keyword lists over its lowercased title + summary.
pub fn classify_focus(item: &NewsItem) -> NewsFocus {
    let haystack = format!("{} {}", item.title, item.summary).to_lowercase();
    if MACRO_FOCUS_REGEX.is_match(&haystack) {
        NewsFocus::Macro
    } else if EARNINGS_FOCUS_REGEX.is_match(&haystack) {
        NewsFocus::Earnings
    } else if TECH_FOCUS_REGEX.is_match(&haystack) {
        NewsFocus::Tech
    } else {
        NewsFocus::All
    }
}

pub fn filter_by_focus(items: Vec<NewsItem>, focus: NewsFocus) -> Vec<NewsItem> {
    if focus == NewsFocus::All {
        return items;
    }
    items
        .into_iter()
        .filter(|item| classify_focus(item) == focus)
        .collect()
}

/// Drops repeats of the same (title, source) pair, keeping first occurrence.
pub fn dedupe_items(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(format!("{}|{}", item.title.to_lowercase(), item.source)))
        .collect()
}

/// Title collapsed to letters and digits; used to spot cross-source echoes.
pub fn normalize_title_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    TITLE_KEY_REGEX.replace_all(&lowered, " ").trim().to_string()
}

/// Step function over headline age in hours; unknown timestamps score 2.
pub fn freshness_score(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(published_at) = published_at else {
        return 2;
    };
    let age_hours = (now - published_at).num_seconds().max(0) as f64 / 3600.0;
    if age_hours <= 1.0 {
        35
    } else if age_hours <= 3.0 {
        30
    } else if age_hours <= 8.0 {
        24
    } else if age_hours <= 24.0 {
        16
    } else if age_hours <= 48.0 {
        9
    } else if age_hours <= 96.0 {
        4
    } else {
        1
    }
}

/// Keyword and echo signals layered on top of freshness.
pub fn popularity_score(item: &NewsItem, duplicate_count: usize) -> i64 {
    let text = format!("{} {}", item.title, item.summary).to_lowercase();
    let mut score = 0;
    if BREAKING_REGEX.is_match(&text) {
        score += 16;
    }
    if MARKET_MOVER_REGEX.is_match(&text) {
        score += 12;
    }
    if IMPACT_REGEX.is_match(&text) {
        score += 6;
    }
    if duplicate_count > 1 {
        score += (duplicate_count - 1).min(3) as i64 * 10;
    }
    score
}

/// Dedupes and scores items, sorted by score then recency descending.
pub fn rank_items(items: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<RankedNewsItem> {
    let deduped = dedupe_items(items);
    let mut key_counts: HashMap<String, usize> = HashMap::new();
    for item in &deduped {
        *key_counts.entry(normalize_title_key(&item.title)).or_insert(0) += 1;
    }

    let mut ranked: Vec<RankedNewsItem> = deduped
        .into_iter()
        .map(|item| {
            let duplicates = key_counts
                .get(&normalize_title_key(&item.title))
                .copied()
                .unwrap_or(1);
            let score = freshness_score(item.published_at, now) + popularity_score(&item, duplicates);
            RankedNewsItem { item, score }
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| {
            let a_ms = a.item.published_at.map_or(0, |t| t.timestamp_millis());
            let b_ms = b.item.published_at.map_or(0, |t| t.timestamp_millis());
            b_ms.cmp(&a_ms)
        })
    });
    ranked
}

/// Focus-filters, ranks, and keeps the digest's top headlines.
pub fn build_news_digest(
    items: Vec<NewsItem>,
    focus: NewsFocus,
    now: DateTime<Utc>,
) -> Vec<RankedNewsItem> {
    let mut ranked = rank_items(filter_by_focus(items, focus), now);
    ranked.truncate(NEWS_DIGEST_SIZE);
    ranked
}

/// Only plain web links leave the core; anything else becomes `None`.
pub fn safe_http_url(value: &str) -> Option<String> {
    let url = Url::parse(value).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
