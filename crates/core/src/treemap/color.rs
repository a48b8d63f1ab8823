/// Fill and border colours for one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatColor {
    pub fill: String,
    pub border: String,
}

const HEAT_CLAMP: f64 = 0.1;
const HEAT_GAMMA: f64 = 0.85;

const POSITIVE_BASE: [f64; 3] = [36.0, 62.0, 52.0];
const POSITIVE_FULL: [f64; 3] = [63.0, 164.0, 117.0];
const NEGATIVE_BASE: [f64; 3] = [66.0, 42.0, 46.0];
const NEGATIVE_FULL: [f64; 3] = [186.0, 79.0, 92.0];

const CALENDAR_POSITIVE_BASE: [f64; 3] = [36.0, 81.0, 58.0];
const CALENDAR_POSITIVE_FULL: [f64; 3] = [97.0, 220.0, 150.0];
const CALENDAR_NEGATIVE_BASE: [f64; 3] = [88.0, 44.0, 53.0];
const CALENDAR_NEGATIVE_FULL: [f64; 3] = [236.0, 111.0, 124.0];

const CALENDAR_EMPTY: &str = "#121a2a";

fn lerp_rgb(from: [f64; 3], to: [f64; 3], t: f64) -> [i64; 3] {
    [
        (from[0] + (to[0] - from[0]) * t).round() as i64,
        (from[1] + (to[1] - from[1]) * t).round() as i64,
        (from[2] + (to[2] - from[2]) * t).round() as i64,
    ]
}

/// Daily-change colour: clamped to ±10%, eased toward the saturated end,
/// with the border 12 darker per channel.
pub fn heat_color(daily_pct: f64) -> HeatColor {
    let pct = if daily_pct.is_finite() { daily_pct } else { 0.0 };
    let clamped = pct.clamp(-HEAT_CLAMP, HEAT_CLAMP);
    let t = (clamped.abs() / HEAT_CLAMP).min(1.0).powf(HEAT_GAMMA);
    let (from, to) = if clamped >= 0.0 {
        (POSITIVE_BASE, POSITIVE_FULL)
    } else {
        (NEGATIVE_BASE, NEGATIVE_FULL)
    };
    let [r, g, b] = lerp_rgb(from, to, t);
    HeatColor {
        fill: format!("rgb({r}, {g}, {b})"),
        border: format!(
            "rgb({}, {}, {})",
            (r - 12).max(0),
            (g - 12).max(0),
            (b - 12).max(0)
        ),
    }
}

/// Calendar cell colour scaled by `|pl| / maxAbs` against the month's
/// largest move; unusable values get the empty-cell colour.
pub fn calendar_cell_color(pl: f64, max_abs: f64) -> String {
    if !pl.is_finite() {
        return CALENDAR_EMPTY.to_string();
    }
    let ratio = if max_abs > 0.0 {
        (pl.abs() / max_abs).min(1.0)
    } else {
        0.0
    };
    let (from, to) = if pl >= 0.0 {
        (CALENDAR_POSITIVE_BASE, CALENDAR_POSITIVE_FULL)
    } else {
        (CALENDAR_NEGATIVE_BASE, CALENDAR_NEGATIVE_FULL)
    };
    let [r, g, b] = lerp_rgb(from, to, ratio);
    format!("rgb({r}, {g}, {b})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_day_uses_positive_base() {
        let color = heat_color(0.0);
        assert_eq!(color.fill, "rgb(36, 62, 52)");
        assert_eq!(color.border, "rgb(24, 50, 40)");
    }

    #[test]
    fn test_large_moves_saturate() {
        assert_eq!(heat_color(0.25).fill, "rgb(63, 164, 117)");
        assert_eq!(heat_color(-0.25).fill, "rgb(186, 79, 92)");
    }

    #[test]
    fn test_negative_moves_use_red_ramp() {
        let color = heat_color(-0.001);
        assert!(color.fill.starts_with("rgb(6"));
    }

    #[test]
    fn test_non_finite_pct_is_flat() {
        assert_eq!(heat_color(f64::NAN), heat_color(0.0));
    }

    #[test]
    fn test_calendar_extremes() {
        assert_eq!(calendar_cell_color(f64::NAN, 10.0), "#121a2a");
        assert_eq!(calendar_cell_color(10.0, 10.0), "rgb(97, 220, 150)");
        assert_eq!(calendar_cell_color(-10.0, 10.0), "rgb(236, 111, 124)");
        assert_eq!(calendar_cell_color(0.0, 10.0), "rgb(36, 81, 58)");
        assert_eq!(calendar_cell_color(5.0, 0.0), "rgb(36, 81, 58)");
    }
}
