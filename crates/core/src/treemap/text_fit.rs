use crate::treemap::Rect;
use crate::utils::format_signed_percent;

/// Label detail level a tile can afford.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Hide,
    Ticker,
    TickerPct,
    Full,
}

/// Title font in points by tile area, larger tiles get larger type.
pub fn title_font_size(area: i64) -> i64 {
    if area > 140_000 {
        22
    } else if area > 90_000 {
        18
    } else if area > 45_000 {
        15
    } else if area > 18_000 {
        12
    } else {
        11
    }
}

// Width per character as a fraction of the font size, and line height
// multipliers. Tuned for the dashboard's monospace-ish tile labels.
const CHAR_WIDTH_FACTOR: f64 = 0.62;
const PCT_CHAR_WIDTH_FACTOR: f64 = 0.56;

fn glyph_width(chars: usize, font: i64, factor: f64) -> i64 {
    (chars as f64 * font as f64 * factor).ceil() as i64
}

fn line_height(font: i64, factor: f64) -> i64 {
    (font as f64 * factor).ceil() as i64
}

/// Decides which label layout fits the tile.
///
/// The floor is a 6-px padded ticker at 11 pt; below that the tile hides.
/// Above it, the full three-line label is preferred, then the two-line
/// ticker-plus-percent form, then the bare ticker.
pub fn text_mode(name: &str, daily_pct: f64, rect: &Rect) -> TextMode {
    let width = rect.width;
    let height = rect.height;
    let area = width * height;
    let title_chars = name.chars().count().max(1);
    let pct_chars = format_signed_percent(daily_pct).chars().count().max(1);

    let compact_pad = 6;
    let compact_font = 11;
    let compact_inner_w = width - compact_pad * 2;
    let compact_inner_h = height - compact_pad * 2;
    let compact_need_w = glyph_width(title_chars, compact_font, CHAR_WIDTH_FACTOR);
    let compact_need_h = line_height(compact_font, 1.25);
    if compact_inner_w < compact_need_w || compact_inner_h < compact_need_h {
        return TextMode::Hide;
    }

    let full_pad = if area > 140_000 { 18 } else { 12 };
    let title_font = title_font_size(area);
    let meta_font = if area > 90_000 { 12 } else { 11 };
    let full_inner_w = width - full_pad * 2;
    let full_inner_h = height - full_pad * 2;
    let full_need_w = glyph_width(title_chars, title_font, CHAR_WIDTH_FACTOR).max(72);
    let full_need_h = line_height(title_font, 1.25)
        + 6
        + line_height(meta_font, 1.35)
        + 6
        + line_height(meta_font, 1.35);
    if full_inner_w >= full_need_w && full_inner_h >= full_need_h {
        return TextMode::Full;
    }

    let pct_pad = 8;
    let pct_title_font = 11;
    let pct_meta_font = 10;
    let pct_inner_w = width - pct_pad * 2;
    let pct_inner_h = height - pct_pad * 2;
    let pct_need_w = glyph_width(title_chars, pct_title_font, CHAR_WIDTH_FACTOR)
        .max(glyph_width(pct_chars, pct_meta_font, PCT_CHAR_WIDTH_FACTOR));
    let pct_need_h = line_height(pct_title_font, 1.25) + 4 + line_height(pct_meta_font, 1.3);
    if pct_inner_w >= pct_need_w && pct_inner_h >= pct_need_h {
        return TextMode::TickerPct;
    }
    TextMode::Ticker
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: i64, height: i64) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_title_font_ladder() {
        assert_eq!(title_font_size(150_000), 22);
        assert_eq!(title_font_size(100_000), 18);
        assert_eq!(title_font_size(50_000), 15);
        assert_eq!(title_font_size(20_000), 12);
        assert_eq!(title_font_size(10_000), 11);
    }

    #[test]
    fn test_tiny_tile_hides() {
        assert_eq!(text_mode("AAPL", 0.01, &rect(20, 20)), TextMode::Hide);
    }

    #[test]
    fn test_large_tile_gets_full_label() {
        assert_eq!(text_mode("AAPL", 0.01, &rect(400, 300)), TextMode::Full);
    }

    #[test]
    fn test_mid_tile_gets_ticker_and_pct() {
        // Enough for two small lines but short of the full three-line label.
        assert_eq!(text_mode("AAPL", 0.01, &rect(60, 50)), TextMode::TickerPct);
    }

    #[test]
    fn test_short_tile_gets_bare_ticker() {
        assert_eq!(text_mode("AAPL", 0.01, &rect(60, 28)), TextMode::Ticker);
    }

    #[test]
    fn test_long_ticker_needs_wider_tile() {
        assert_eq!(text_mode("BRKB-LONG", 0.01, &rect(60, 50)), TextMode::Hide);
        assert_ne!(text_mode("BRKB-LONG", 0.01, &rect(120, 50)), TextMode::Hide);
    }
}
