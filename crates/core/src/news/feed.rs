use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::Result;
use crate::news::NewsItem;

const SUMMARY_MAX_LENGTH: usize = 180;

lazy_static! {
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]+>").expect("Invalid regex pattern");
}

/// A headline provider. Implementations fetch and parse one feed; failures
/// surface as errors so the caller can fall back to other sources.
#[async_trait]
pub trait NewsFeedSource: Send + Sync {
    /// Human-readable label stamped onto each item.
    fn label(&self) -> &str;

    async fn fetch_items(&self) -> Result<Vec<NewsItem>>;
}

/// Replaces tags with spaces and collapses whitespace runs.
pub fn strip_html(value: &str) -> String {
    let without_tags = HTML_TAG_REGEX.replace_all(value, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips markup and truncates to a 180-character summary with an ellipsis.
pub fn summarize_text(value: &str) -> String {
    let text = strip_html(value);
    if text.chars().count() <= SUMMARY_MAX_LENGTH {
        return text;
    }
    let truncated: String = text.chars().take(SUMMARY_MAX_LENGTH - 1).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags_and_collapses_whitespace() {
        assert_eq!(
            strip_html("<p>Stocks  <b>rally</b></p>\n after CPI"),
            "Stocks rally after CPI"
        );
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_summarize_short_text_unchanged() {
        assert_eq!(summarize_text("Short headline"), "Short headline");
    }

    #[test]
    fn test_summarize_truncates_long_text() {
        let long = "word ".repeat(100);
        let summary = summarize_text(&long);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_MAX_LENGTH + 2);
    }
}
