//! Tooltip placement in viewport coordinates.

use crate::surface::{Point, Rect};

pub const TOOLTIP_HEIGHT: f64 = 120.0;
pub const TOOLTIP_WIDTH: f64 = 280.0;
const GAP: f64 = 8.0;
const EDGE: f64 = 10.0;

/// Top-left corner for a tooltip attached to `anchor`.
///
/// Goes above the anchor when there is room for the box plus a little
/// clearance, otherwise below. Horizontally it starts at the anchor's left
/// edge and is pulled back inside the viewport.
pub fn place_tooltip(anchor: Rect, viewport_width: f64) -> Point {
    let top = if anchor.y > TOOLTIP_HEIGHT + 20.0 {
        anchor.y - TOOLTIP_HEIGHT - GAP
    } else {
        anchor.bottom() + GAP
    };

    let mut left = anchor.x;
    if left + TOOLTIP_WIDTH > viewport_width {
        left = viewport_width - TOOLTIP_WIDTH - EDGE;
    }
    if left < EDGE {
        left = EDGE;
    }
    Point::new(left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_when_room() {
        let p = place_tooltip(Rect::new(100.0, 300.0, 50.0, 20.0), 1200.0);
        assert_eq!(p, Point::new(100.0, 172.0));
    }

    #[test]
    fn test_below_near_top() {
        let p = place_tooltip(Rect::new(100.0, 140.0, 50.0, 20.0), 1200.0);
        assert_eq!(p, Point::new(100.0, 168.0));
    }

    #[test]
    fn test_clamped_to_right_edge() {
        let p = place_tooltip(Rect::new(1000.0, 300.0, 50.0, 20.0), 1200.0);
        assert_eq!(p.x, 910.0);
    }

    #[test]
    fn test_clamped_to_left_edge() {
        assert_eq!(place_tooltip(Rect::new(2.0, 300.0, 5.0, 5.0), 1200.0).x, 10.0);
        // Narrow viewport: the right clamp goes negative, the left clamp wins.
        assert_eq!(place_tooltip(Rect::new(50.0, 300.0, 5.0, 5.0), 200.0).x, 10.0);
    }
}
