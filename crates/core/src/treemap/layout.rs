use crate::holdings::DisplayRow;
use crate::treemap::{text_mode, TextMode};

/// One weighted entry feeding the layout, pre-sorted by value descending.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapItem {
    pub name: String,
    pub value: f64,
    pub daily_pct: f64,
}

/// Integer-pixel rectangle inside the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn area(&self) -> i64 {
        self.width * self.height
    }
}

/// A placed item.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapTile {
    pub item: TreemapItem,
    pub rect: Rect,
}

/// Final layout: placed tiles plus the count that could not fit readably.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapLayout {
    pub tiles: Vec<TreemapTile>,
    pub hidden_count: usize,
}

/// Extracts positive-value rows as layout items, largest first.
pub fn build_treemap_items(rows: &[DisplayRow]) -> Vec<TreemapItem> {
    let mut items: Vec<TreemapItem> = rows
        .iter()
        .filter(|row| !row.ticker.is_empty() && row.value > 0.0)
        .map(|row| TreemapItem {
            name: row.ticker.to_uppercase(),
            value: row.value,
            daily_pct: row.daily_pct,
        })
        .collect();
    items.sort_by(|a, b| b.value.total_cmp(&a.value));
    items
}

/// Recursive median-mass partition of the box.
///
/// Splits along the longer side at the index where the running mass crosses
/// half the total, clamped so both halves are non-empty and at least one
/// pixel wide. Boxes that collapse to a one-pixel strip fall back to a
/// linear split.
pub fn layout_rectangles(items: &[TreemapItem], x: i64, y: i64, width: i64, height: i64) -> Vec<TreemapTile> {
    if items.is_empty() || width <= 0 || height <= 0 {
        return Vec::new();
    }
    if items.len() == 1 {
        return vec![TreemapTile {
            item: items[0].clone(),
            rect: Rect {
                x,
                y,
                width,
                height,
            },
        }];
    }

    let total: f64 = items.iter().map(|item| item.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    if width <= 1 || height <= 1 {
        return layout_linear(items, x, y, width, height, width >= height);
    }

    let target = total / 2.0;
    let mut running = 0.0;
    let mut split_idx = 0usize;
    while split_idx < items.len() - 1 && running < target {
        running += items[split_idx].value;
        split_idx += 1;
    }
    let split_idx = split_idx.clamp(1, items.len() - 1);

    let (first, second) = items.split_at(split_idx);
    let first_total: f64 = first.iter().map(|item| item.value).sum();
    let ratio = first_total / total;

    if width >= height {
        let raw = (width as f64 * ratio).round() as i64;
        let first_width = raw.clamp(1, width - 1);
        let mut tiles = layout_rectangles(first, x, y, first_width, height);
        tiles.extend(layout_rectangles(second, x + first_width, y, width - first_width, height));
        tiles
    } else {
        let raw = (height as f64 * ratio).round() as i64;
        let first_height = raw.clamp(1, height - 1);
        let mut tiles = layout_rectangles(first, x, y, width, first_height);
        tiles.extend(layout_rectangles(second, x, y + first_height, width, height - first_height));
        tiles
    }
}

/// Strip layout along the longer axis; each item gets a rounded share of
/// the span, the last one absorbs the remainder.
fn layout_linear(
    items: &[TreemapItem],
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    split_by_width: bool,
) -> Vec<TreemapTile> {
    let subtotal: f64 = items.iter().map(|item| item.value).sum();
    if subtotal <= 0.0 || width <= 0 || height <= 0 {
        return Vec::new();
    }
    let span = if split_by_width { width } else { height };
    let mut out = Vec::with_capacity(items.len());
    let mut prev = 0i64;
    let mut mass = 0.0;
    for (idx, item) in items.iter().enumerate() {
        mass += item.value;
        let next = if idx == items.len() - 1 {
            span
        } else {
            ((mass / subtotal) * span as f64).round() as i64
        };
        let size = (next - prev).max(0);
        let rect = if split_by_width {
            Rect {
                x: x + prev,
                y,
                width: size,
                height,
            }
        } else {
            Rect {
                x,
                y: y + prev,
                width,
                height: size,
            }
        };
        out.push(TreemapTile {
            item: item.clone(),
            rect,
        });
        prev = next;
    }
    out
}

const MAX_READABILITY_PASSES: usize = 4;

/// Partitions repeatedly, dropping tiles whose label cannot fit and
/// repacking the survivors, until the set is stable or passes run out.
pub fn layout_visible_items(items: &[TreemapItem], width: i64, height: i64) -> TreemapLayout {
    let mut current: Vec<TreemapItem> = items.to_vec();
    let mut tiles: Vec<TreemapTile> = Vec::new();

    for _ in 0..MAX_READABILITY_PASSES {
        if current.is_empty() {
            break;
        }
        tiles = layout_rectangles(&current, 0, 0, width, height)
            .into_iter()
            .filter(|tile| tile.rect.width > 0 && tile.rect.height > 0)
            .collect();
        let visible: Vec<TreemapTile> = tiles
            .iter()
            .filter(|tile| {
                text_mode(&tile.item.name, tile.item.daily_pct, &tile.rect) != TextMode::Hide
            })
            .cloned()
            .collect();

        if visible.is_empty() {
            return TreemapLayout {
                tiles: Vec::new(),
                hidden_count: items.len(),
            };
        }
        if visible.len() == tiles.len() {
            return TreemapLayout {
                hidden_count: items.len().saturating_sub(visible.len()),
                tiles: visible,
            };
        }
        current = visible.into_iter().map(|tile| tile.item).collect();
    }

    TreemapLayout {
        hidden_count: items.len().saturating_sub(tiles.len()),
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, value: f64) -> TreemapItem {
        TreemapItem {
            name: name.into(),
            value,
            daily_pct: 0.01,
        }
    }

    fn total_area(tiles: &[TreemapTile]) -> i64 {
        tiles.iter().map(|tile| tile.rect.area()).sum()
    }

    #[test]
    fn test_single_item_fills_box() {
        let tiles = layout_rectangles(&[item("AAPL", 100.0)], 0, 0, 800, 400);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].rect, Rect { x: 0, y: 0, width: 800, height: 400 });
    }

    #[test]
    fn test_partition_covers_box_exactly() {
        let items = vec![
            item("A", 50.0),
            item("B", 25.0),
            item("C", 15.0),
            item("D", 10.0),
        ];
        let tiles = layout_rectangles(&items, 0, 0, 800, 400);
        assert_eq!(tiles.len(), 4);
        assert_eq!(total_area(&tiles), 800 * 400);
    }

    #[test]
    fn test_split_proportional_along_longer_side() {
        let items = vec![item("A", 75.0), item("B", 25.0)];
        let tiles = layout_rectangles(&items, 0, 0, 800, 400);
        // Wider than tall, so the split is vertical at 75% of the width.
        assert_eq!(tiles[0].rect.width, 600);
        assert_eq!(tiles[1].rect.x, 600);
        assert_eq!(tiles[1].rect.width, 200);
    }

    #[test]
    fn test_degenerate_strip_linear_split() {
        let items = vec![item("A", 60.0), item("B", 40.0)];
        let tiles = layout_rectangles(&items, 0, 0, 1, 100);
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].rect.height, 60);
        assert_eq!(tiles[1].rect.height, 40);
        assert_eq!(tiles[1].rect.y, 60);
    }

    #[test]
    fn test_every_tile_at_least_one_pixel() {
        let mut items: Vec<TreemapItem> = (0..20)
            .map(|i| item(&format!("T{i}"), 1000.0 / (i as f64 + 1.0)))
            .collect();
        items.sort_by(|a, b| b.value.total_cmp(&a.value));
        let tiles = layout_rectangles(&items, 0, 0, 300, 200);
        assert_eq!(tiles.len(), 20);
        for tile in &tiles {
            assert!(tile.rect.width >= 1, "{:?}", tile.rect);
            assert!(tile.rect.height >= 1, "{:?}", tile.rect);
        }
        assert_eq!(total_area(&tiles), 300 * 200);
    }

    #[test]
    fn test_visible_layout_keeps_everything_in_big_box() {
        let items = vec![item("AAPL", 60.0), item("MSFT", 40.0)];
        let layout = layout_visible_items(&items, 900, 600);
        assert_eq!(layout.tiles.len(), 2);
        assert_eq!(layout.hidden_count, 0);
    }

    #[test]
    fn test_visible_layout_hides_unreadable_tiles() {
        // A dominant position and many slivers inside a small box: the
        // slivers cannot hold an 11pt ticker and get dropped and repacked.
        let mut items = vec![item("BIGPOSITION", 10_000.0)];
        for i in 0..15 {
            items.push(item(&format!("S{i}"), 1.0));
        }
        let layout = layout_visible_items(&items, 160, 60);
        assert!(layout.hidden_count > 0);
        assert_eq!(layout.tiles.len() + layout.hidden_count, items.len());
    }

    #[test]
    fn test_visible_layout_empty_when_nothing_fits() {
        let items = vec![item("VERYLONGTICKERNAME", 10.0)];
        let layout = layout_visible_items(&items, 8, 8);
        assert!(layout.tiles.is_empty());
        assert_eq!(layout.hidden_count, 1);
    }

    #[test]
    fn test_build_items_filters_and_sorts() {
        use crate::holdings::AssetKind;
        let rows = vec![
            DisplayRow {
                ticker: "aapl".into(),
                shares: 1.0,
                price: 100.0,
                regular_price: 100.0,
                daily_pct: 0.01,
                value: 100.0,
                kind: AssetKind::Equity,
                sector: "Tech".into(),
                month_pct: None,
                year_pct: None,
            },
            DisplayRow {
                ticker: "MSFT".into(),
                shares: 2.0,
                price: 200.0,
                regular_price: 200.0,
                daily_pct: 0.0,
                value: 400.0,
                kind: AssetKind::Equity,
                sector: "Tech".into(),
                month_pct: None,
                year_pct: None,
            },
            DisplayRow {
                ticker: "ZERO".into(),
                shares: 0.0,
                price: 0.0,
                regular_price: 0.0,
                daily_pct: 0.0,
                value: 0.0,
                kind: AssetKind::Equity,
                sector: "Tech".into(),
                month_pct: None,
                year_pct: None,
            },
        ];
        let items = build_treemap_items(&rows);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "MSFT");
        assert_eq!(items[1].name, "AAPL");
    }
}
