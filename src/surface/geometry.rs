//! Logical-coordinate geometry shared by the surfaces and the page layer.

use super::Dash;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two rectangles, `None` when they only touch or are apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }
}

/// Split a polyline into the visible pieces of a dash pattern.
///
/// The pattern phase carries across vertices, so a dash that starts near the
/// end of one segment continues onto the next.
pub fn dash_segments(points: &[Point], dash: Dash) -> Vec<(Point, Point)> {
    let mut segments = Vec::new();
    if points.len() < 2 || dash.on <= 0.0 {
        return segments;
    }
    let off = dash.off.max(0.0);

    let mut drawing = true;
    let mut remaining = dash.on;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = a.distance(b);
        if len == 0.0 {
            continue;
        }

        let mut t = 0.0;
        while t < len {
            let step = remaining.min(len - t);
            if drawing && step > 0.0 {
                segments.push((a.lerp(b, t / len), a.lerp(b, (t + step) / len)));
            }
            t += step;
            remaining -= step;
            if remaining <= 0.0 {
                drawing = !drawing;
                remaining = if drawing { dash.on } else { off };
            }
        }
    }
    segments
}

/// Horizontal spans `(x_start, x_end)` where the row `y` lies inside the
/// polygon, using the even-odd rule.
pub fn scanline_spans(polygon: &[Point], y: f64) -> Vec<(f64, f64)> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let mut crossings: Vec<f64> = (0..n)
        .filter_map(|i| {
            let p = polygon[i];
            let q = polygon[(i + 1) % n];
            let spans_row = (p.y <= y && y < q.y) || (q.y <= y && y < p.y);
            spans_row.then(|| p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y))
        })
        .collect();
    crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
