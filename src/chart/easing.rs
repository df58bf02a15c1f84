//! Animation progress: frame counter to eased fraction to visible points.

use super::series::MONTHS;

/// Frames in one full reveal.
pub const TOTAL_FRAMES: u32 = 60;

/// Cubic ease-out: fast start, decelerating into 1.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Linear progress of `frame`, clamped to `[0, 1]`.
pub fn progress(frame: u32) -> f64 {
    (frame as f64 / TOTAL_FRAMES as f64).min(1.0)
}

pub fn eased(frame: u32) -> f64 {
    ease_out_cubic(progress(frame))
}

/// Number of leading samples revealed at `frame`.
pub fn visible_points(frame: u32) -> usize {
    ((eased(frame) * MONTHS as f64).floor() as usize).min(MONTHS)
}
