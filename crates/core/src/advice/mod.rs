//! Rule-based advice lines and the exportable AI prompt, derived from the
//! current rows and ranked headlines.

use regex::Regex;

use crate::holdings::DisplayRow;
use crate::news::NewsItem;
use crate::portfolio::{sorted_rows, SortDirection, SortKey};
use crate::utils::{format_percent, format_signed_percent};

const ADVICE_MAX_LINES: usize = 5;
const MENTIONS_LIMIT: usize = 3;
const PROMPT_HOLDINGS_LIMIT: usize = 8;
const PROMPT_HEADLINES_LIMIT: usize = 8;

/// Investor posture that seasons the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdviceMode {
    #[default]
    Balanced,
    Defensive,
    Growth,
    Active,
}

impl AdviceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceMode::Balanced => "balanced",
            AdviceMode::Defensive => "defensive",
            AdviceMode::Growth => "growth",
            AdviceMode::Active => "active",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "defensive" => AdviceMode::Defensive,
            "growth" => AdviceMode::Growth,
            "active" => AdviceMode::Active,
            _ => AdviceMode::Balanced,
        }
    }
}

/// A headline that names one of the portfolio's tickers.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerMention {
    pub ticker: String,
    pub title: String,
    pub source: String,
}

/// Headlines whose title contains a portfolio ticker as a whole word.
pub fn ticker_mentions(news: &[NewsItem], tickers: &[String]) -> Vec<TickerMention> {
    let mut mentions = Vec::new();
    for item in news {
        let upper = item.title.to_uppercase();
        for ticker in tickers {
            let clean = ticker.trim().to_uppercase();
            if clean.is_empty() {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(&clean));
            let matched = Regex::new(&pattern)
                .map(|re| re.is_match(&upper))
                .unwrap_or(false);
            if matched {
                mentions.push(TickerMention {
                    ticker: clean,
                    title: item.title.clone(),
                    source: item.source.clone(),
                });
            }
        }
    }
    mentions.truncate(MENTIONS_LIMIT);
    mentions
}

/// Up to five advice lines: concentration, dispersion, headline overlap,
/// and one mode-specific reminder.
pub fn generate_advice(rows: &[DisplayRow], news: &[NewsItem], mode: AdviceMode) -> Vec<String> {
    let sorted = sorted_rows(rows, SortKey::Value, SortDirection::Desc);
    if sorted.is_empty() {
        return vec!["Load your holdings to generate portfolio-specific advice.".to_string()];
    }

    let total: f64 = sorted.iter().map(|row| row.value).sum();
    let top3: f64 = sorted.iter().take(3).map(|row| row.value).sum();
    let top3_weight = if total > 0.0 { top3 / total } else { 0.0 };
    let top1_weight = if total > 0.0 { sorted[0].value / total } else { 0.0 };
    let tickers: Vec<String> = sorted.iter().map(|row| row.ticker.clone()).collect();
    let mentions = ticker_mentions(news, &tickers);

    let mut lines = Vec::new();

    if top1_weight > 0.35 {
        lines.push(format!(
            "Concentration risk is high: {} is {} of your portfolio. Consider trimming or hedging to reduce single-name shock risk.",
            sorted[0].ticker,
            format_percent(top1_weight)
        ));
    } else if top3_weight > 0.65 {
        lines.push(format!(
            "Top-3 concentration is {}. Add 1-2 lower-correlation positions or increase cash to improve downside resilience.",
            format_percent(top3_weight)
        ));
    } else {
        lines.push(
            "Position sizing looks reasonably balanced. Keep reviewing weights weekly so winners do not silently over-concentrate."
                .to_string(),
        );
    }

    let best = sorted
        .iter()
        .fold(&sorted[0], |acc, row| if row.daily_pct > acc.daily_pct { row } else { acc });
    let worst = sorted
        .iter()
        .fold(&sorted[0], |acc, row| if row.daily_pct < acc.daily_pct { row } else { acc });
    lines.push(format!(
        "Today's dispersion is wide: strongest is {} ({}), weakest is {} ({}). Re-check thesis before reacting to one-day moves.",
        best.ticker,
        format_signed_percent(best.daily_pct),
        worst.ticker,
        format_signed_percent(worst.daily_pct)
    ));

    if mentions.is_empty() {
        lines.push(
            "Recent headlines are mostly macro-level; prioritize position sizing and risk controls over aggressive turnover."
                .to_string(),
        );
    } else {
        let mention_text = mentions
            .iter()
            .map(|m| format!("{} ({})", m.ticker, m.source))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "Recent headlines directly touching your holdings: {mention_text}. Read those first before making allocation changes."
        ));
    }

    lines.push(
        match mode {
            AdviceMode::Defensive => "Defensive mode: keep some dry powder, reduce leverage, and focus on balance-sheet quality and stable earnings visibility.",
            AdviceMode::Growth => "Growth mode: add only on quality pullbacks, and set max position limits to avoid concentration creep.",
            AdviceMode::Active => "Active mode: predefine invalidation levels and take-profit rules before entering trades to avoid emotional execution.",
            AdviceMode::Balanced => "Balanced mode: maintain core positions, rebalance on outsized moves, and let news confirm or challenge your thesis.",
        }
        .to_string(),
    );

    lines.truncate(ADVICE_MAX_LINES);
    lines
}

/// A self-contained prompt the user can paste into an external AI chat.
pub fn build_advice_prompt(rows: &[DisplayRow], news: &[NewsItem], mode: AdviceMode) -> String {
    let top = sorted_rows(rows, SortKey::Value, SortDirection::Desc);
    let holdings_block = top
        .iter()
        .take(PROMPT_HOLDINGS_LIMIT)
        .map(|row| {
            format!(
                "{}: shares={}, price={}, value={:.2}, dailyPct={:.2}%",
                row.ticker,
                row.shares,
                row.price,
                row.value,
                row.daily_pct * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let news_block = news
        .iter()
        .take(PROMPT_HEADLINES_LIMIT)
        .map(|item| format!("- [{}] {}", item.source, item.title))
        .collect::<Vec<_>>()
        .join("\n");

    [
        "You are a professional equity portfolio advisor.".to_string(),
        format!("Investor mode: {}.", mode.as_str()),
        "Analyze this portfolio and recent market headlines.".to_string(),
        "Give concise, actionable advice with: 1) risks, 2) opportunities, 3) concrete next actions."
            .to_string(),
        String::new(),
        "Holdings:".to_string(),
        if holdings_block.is_empty() {
            "No holdings loaded.".to_string()
        } else {
            holdings_block
        },
        String::new(),
        "Recent headlines:".to_string(),
        if news_block.is_empty() {
            "No headlines loaded.".to_string()
        } else {
            news_block
        },
    ]
    .join("\n")
}
