//! Surface module - Drawing surfaces the chart renders into
//!
//! A [`Canvas`] is the sized host element (container size + pixel ratio) and
//! hands out a [`DrawContext`] when one is available. Every draw call takes
//! its style as an explicit value; contexts carry no fill/stroke state.

mod geometry;
mod pixmap;
mod recording;
mod style;

pub use geometry::{dash_segments, scanline_spans, Point, Rect, Size};
pub use pixmap::{PixelCanvas, PixelFrame, DEFAULT_BACKGROUND, MAX_DEVICE_PIXELS};
pub use recording::{DrawOp, RecordingCanvas};
pub use style::{Color, Dash, LinearGradient, Paint, StrokeStyle, TextAlign, TextStyle};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Invalid surface size {width}x{height} at pixel ratio {pixel_ratio}")]
    InvalidSize {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    #[error("Drawing backend error: {0}")]
    Backend(String),
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Immediate-mode 2D drawing in logical coordinates.
pub trait DrawContext {
    /// Size the backing store to `size * pixel_ratio` and scale all later
    /// drawing by `pixel_ratio`.
    fn set_size(&mut self, size: Size, pixel_ratio: f64) -> Result<(), SurfaceError>;

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError>;

    /// Stroke an open polyline. Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle)
        -> Result<(), SurfaceError>;

    /// Fill a closed polygon (even-odd).
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color)
        -> Result<(), SurfaceError>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError>;

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError>;
}

/// A sized drawing element, the way a page hosts a canvas inside a layout box.
pub trait Canvas {
    type Context: DrawContext;

    /// Logical size of the containing layout box.
    fn container_size(&self) -> Size;

    /// Device pixels per logical pixel.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }

    /// The 2D context, or `None` when the element cannot be drawn into.
    fn context(&mut self) -> Option<&mut Self::Context>;
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    type Context = C::Context;

    fn container_size(&self) -> Size {
        (**self).container_size()
    }

    fn pixel_ratio(&self) -> f64 {
        (**self).pixel_ratio()
    }

    fn context(&mut self) -> Option<&mut Self::Context> {
        (**self).context()
    }
}
