//! Heat-map treemap: recursive area-proportional partition with an
//! iterative text-fit pass that hides unreadable tiles.

mod color;
mod layout;
mod text_fit;

pub use color::{calendar_cell_color, heat_color, HeatColor};
pub use layout::{build_treemap_items, layout_rectangles, layout_visible_items, Rect, TreemapItem, TreemapLayout, TreemapTile};
pub use text_fit::{text_mode, title_font_size, TextMode};
