//! Recording surface: keeps every draw call as a [`DrawOp`].

use super::{Canvas, Color, DrawContext, Paint, Point, Rect, Size, StrokeStyle, SurfaceError, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetSize {
        size: Size,
        pixel_ratio: f64,
    },
    Clear(Rect),
    Polyline {
        points: Vec<Point>,
        style: StrokeStyle,
    },
    Polygon {
        points: Vec<Point>,
        paint: Paint,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        style: StrokeStyle,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Canvas that records draw operations instead of rasterizing them.
///
/// The log is never cleared by `set_size`, mirroring a surface whose pixels
/// survive a re-invocation at the same size.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    container: Size,
    pixel_ratio: f64,
    attached: bool,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(container: Size, pixel_ratio: f64) -> Self {
        Self {
            container,
            pixel_ratio,
            attached: true,
            ops: Vec::new(),
        }
    }

    /// A canvas that never yields a drawing context.
    pub fn detached(container: Size) -> Self {
        Self {
            attached: false,
            ..Self::new(container, 1.0)
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the log, leaving the canvas attached and empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Text of every recorded `fill_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    type Context = Self;

    fn container_size(&self) -> Size {
        self.container
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn context(&mut self) -> Option<&mut Self> {
        self.attached.then_some(self)
    }
}

impl DrawContext for RecordingCanvas {
    fn set_size(&mut self, size: Size, pixel_ratio: f64) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::SetSize { size, pixel_ratio });
        Ok(())
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Clear(rect));
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            paint: *paint,
        });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            style: *style,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
        Ok(())
    }
}
