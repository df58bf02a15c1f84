//! Plot geometry: margins, viewport and the month/value coordinate mapping.

use super::series::MONTHS;
use crate::surface::{Point, Rect, Size};

/// Top of the value axis, in thousands.
pub const Y_MAX: f64 = 180.0;
/// Gridline and value-label spacing.
pub const GRID_STEP: f64 = 30.0;

/// Fixed inset reserved for labels and the legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGINS: Margins = Margins {
    top: 40.0,
    right: 30.0,
    bottom: 45.0,
    left: 55.0,
};

/// Maps month index and value onto logical pixels for one viewport.
///
/// Both axes are affine: `x(0)` is the left margin, `x(23)` the right edge
/// of the plot; `y(0)` is the plot bottom, `y(Y_MAX)` the top margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub viewport: Size,
    pub margins: Margins,
}

impl ChartLayout {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            margins: MARGINS,
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.viewport.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.viewport.height - self.margins.top - self.margins.bottom
    }

    /// Region wiped at the start of every frame. It overhangs the plot a
    /// little so line caps and dots at the edges are cleared too, but stays
    /// clear of the axis labels.
    pub fn clear_rect(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top - 5.0,
            self.plot_width() + 5.0,
            self.plot_height() + 10.0,
        )
    }

    /// Horizontal pixel of a (possibly fractional) month index.
    pub fn x(&self, month: f64) -> f64 {
        self.margins.left + (month / (MONTHS - 1) as f64) * self.plot_width()
    }

    pub fn y(&self, value: f64) -> f64 {
        self.margins.top + self.plot_height() - (value / Y_MAX) * self.plot_height()
    }

    pub fn point(&self, month: usize, value: f64) -> Point {
        Point::new(self.x(month as f64), self.y(value))
    }

    pub fn month_at(&self, x: f64) -> f64 {
        (x - self.margins.left) / self.plot_width() * (MONTHS - 1) as f64
    }

    pub fn value_at(&self, y: f64) -> f64 {
        (self.margins.top + self.plot_height() - y) / self.plot_height() * Y_MAX
    }

    /// Map the leading samples of a series to screen points.
    pub fn polyline(&self, values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.point(i, v))
            .collect()
    }

    /// Gridline values `0, 30, ..., 180`.
    pub fn grid_values() -> impl Iterator<Item = f64> {
        let steps = (Y_MAX / GRID_STEP) as usize;
        (0..=steps).map(|i| i as f64 * GRID_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChartLayout {
        ChartLayout::new(Size::new(600.0, 300.0))
    }

    #[test]
    fn test_axis_endpoints() {
        let l = layout();
        assert_eq!(l.x(0.0), 55.0);
        assert_eq!(l.x(23.0), 600.0 - 30.0);
        assert_eq!(l.y(0.0), 40.0 + l.plot_height());
        assert_eq!(l.y(0.0), 300.0 - 45.0);
        assert_eq!(l.y(Y_MAX), 40.0);
    }

    #[test]
    fn test_mapping_inverts() {
        let l = layout();
        for month in [0.0, 5.5, 18.0, 23.0] {
            assert!((l.month_at(l.x(month)) - month).abs() < 1e-9);
        }
        for value in [0.0, 45.0, 95.0, 180.0] {
            assert!((l.value_at(l.y(value)) - value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_values() {
        let values: Vec<f64> = ChartLayout::grid_values().collect();
        assert_eq!(values, vec![0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0]);
    }

    #[test]
    fn test_clear_rect_stays_inside_label_areas() {
        let l = layout();
        let clear = l.clear_rect();
        assert_eq!(clear.x, 55.0);
        assert_eq!(clear.y, 35.0);
        // Month labels sit 20px below the plot, legend 15px above it.
        assert!(clear.bottom() < 300.0 - 45.0 + 20.0 - 11.0);
        assert!(clear.y > 40.0 - 15.0);
    }
}
