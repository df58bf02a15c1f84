//! Pixel surface backed by an RGB buffer and the plotters bitmap backend.
//!
//! Logical coordinates are scaled by the pixel ratio and rounded to device
//! pixels. Dashes and vertical gradients are rasterized here on top of the
//! backend's solid primitives.

use super::{
    dash_segments, scanline_spans, Canvas, Color, DrawContext, Paint, Point, Rect, Size,
    StrokeStyle, SurfaceError, TextAlign, TextStyle,
};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::io::Cursor;
use tracing::warn;

/// Page background, `#0a0e1a`. Cleared regions are painted with it.
pub const DEFAULT_BACKGROUND: Color = Color::rgb(10, 14, 26);

/// Largest backing store, in device pixels (8192 x 8192, 192 MiB of RGB).
pub const MAX_DEVICE_PIXELS: usize = 8192 * 8192;

/// Owned copy of the pixel buffer at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl PixelFrame {
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let image = RgbImage::from_raw(self.width, self.height, self.rgb.clone()).ok_or(
            SurfaceError::InvalidSize {
                width: self.width as f64,
                height: self.height as f64,
                pixel_ratio: 1.0,
            },
        )?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Rasterizing canvas. Its backing buffer is allocated by `set_size`.
pub struct PixelCanvas {
    container: Size,
    pixel_ratio: f64,
    scale: f64,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    font_warning_logged: bool,
}

impl PixelCanvas {
    pub fn new(container: Size, pixel_ratio: f64) -> Self {
        Self {
            container,
            pixel_ratio,
            scale: 1.0,
            width: 0,
            height: 0,
            buffer: Vec::new(),
            font_warning_logged: false,
        }
    }

    /// Change the layout box; takes effect at the next `set_size`.
    pub fn set_container(&mut self, container: Size, pixel_ratio: f64) {
        self.container = container;
        self.pixel_ratio = pixel_ratio;
    }

    /// Backing buffer size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rgb(&self) -> &[u8] {
        &self.buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]])
    }

    pub fn snapshot(&self) -> PixelFrame {
        PixelFrame {
            width: self.width,
            height: self.height,
            rgb: self.buffer.clone(),
        }
    }

    fn device(&self, p: Point) -> (i32, i32) {
        (
            (p.x * self.scale).round() as i32,
            (p.y * self.scale).round() as i32,
        )
    }

    fn device_len(&self, len: f64) -> u32 {
        ((len * self.scale).round() as u32).max(1)
    }

    fn backend(&mut self) -> Result<BitMapBackend<'_>, SurfaceError> {
        if self.buffer.is_empty() {
            return Err(SurfaceError::InvalidSize {
                width: self.container.width,
                height: self.container.height,
                pixel_ratio: self.pixel_ratio,
            });
        }
        Ok(BitMapBackend::with_buffer(
            &mut self.buffer,
            (self.width, self.height),
        ))
    }

    fn fill_gradient_rows(
        &mut self,
        device_poly: &[Point],
        paint_at: impl Fn(f64) -> Color,
    ) -> Result<(), SurfaceError> {
        let (min_y, max_y) = device_poly
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let first_row = min_y.floor().max(0.0) as i32;
        let last_row = (max_y.ceil() as i32).min(self.height as i32);
        let scale = self.scale;

        let mut backend = self.backend()?;
        for row in first_row..last_row {
            let y = row as f64 + 0.5;
            let style = ShapeStyle {
                color: paint_at(y / scale).into(),
                filled: true,
                stroke_width: 1,
            };
            for (x0, x1) in scanline_spans(device_poly, y) {
                let start = x0.round() as i32;
                let end = x1.round() as i32 - 1;
                if end < start {
                    continue;
                }
                backend
                    .draw_line((start, row), (end, row), &style)
                    .map_err(backend_error)?;
            }
        }
        backend.present().map_err(backend_error)
    }
}

/// Plotters has no alphabetic baseline anchor; the bottom of the text box is
/// the closest, which puts descenders a few pixels above a true baseline.
fn text_anchor(align: TextAlign) -> Pos {
    let h_pos = match align {
        TextAlign::Left => HPos::Left,
        TextAlign::Center => HPos::Center,
        TextAlign::Right => HPos::Right,
    };
    Pos::new(h_pos, VPos::Bottom)
}

fn backend_error<E: std::fmt::Display>(e: E) -> SurfaceError {
    SurfaceError::Backend(e.to_string())
}

impl Canvas for PixelCanvas {
    type Context = Self;

    fn container_size(&self) -> Size {
        self.container
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn context(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

impl DrawContext for PixelCanvas {
    fn set_size(&mut self, size: Size, pixel_ratio: f64) -> Result<(), SurfaceError> {
        let invalid = SurfaceError::InvalidSize {
            width: size.width,
            height: size.height,
            pixel_ratio,
        };
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            return Err(invalid);
        }
        // Float-to-int casts saturate, so huge or NaN sizes end up at the cap
        // check or at zero.
        let width = (size.width * pixel_ratio) as u32;
        let height = (size.height * pixel_ratio) as u32;
        let pixels = (width as usize).checked_mul(height as usize);
        match pixels {
            Some(n) if n > 0 && n <= MAX_DEVICE_PIXELS => {}
            _ => return Err(invalid),
        }

        // Same backing size keeps the existing pixels.
        if (width, height) != (self.width, self.height) {
            let bg = DEFAULT_BACKGROUND;
            self.buffer = [bg.r, bg.g, bg.b].repeat(width as usize * height as usize);
            self.width = width;
            self.height = height;
        }
        self.scale = pixel_ratio;
        Ok(())
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        let top_left = self.device(Point::new(rect.x, rect.y));
        let bottom_right = self.device(Point::new(rect.right(), rect.bottom()));
        let style = ShapeStyle {
            color: DEFAULT_BACKGROUND.into(),
            filled: true,
            stroke_width: 1,
        };
        let mut backend = self.backend()?;
        backend
            .draw_rect(top_left, bottom_right, &style, true)
            .map_err(backend_error)?;
        backend.present().map_err(backend_error)
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError> {
        if points.len() < 2 {
            return Ok(());
        }
        let shape = ShapeStyle {
            color: style.color.into(),
            filled: false,
            stroke_width: self.device_len(style.width),
        };

        match style.dash {
            Some(dash) => {
                let segments: Vec<_> = dash_segments(points, dash)
                    .into_iter()
                    .map(|(a, b)| (self.device(a), self.device(b)))
                    .collect();
                let mut backend = self.backend()?;
                for (a, b) in segments {
                    backend.draw_line(a, b, &shape).map_err(backend_error)?;
                }
                backend.present().map_err(backend_error)
            }
            None => {
                let path: Vec<_> = points.iter().map(|p| self.device(*p)).collect();
                let mut backend = self.backend()?;
                backend.draw_path(path, &shape).map_err(backend_error)?;
                backend.present().map_err(backend_error)
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) -> Result<(), SurfaceError> {
        if points.len() < 3 {
            return Ok(());
        }
        match *paint {
            Paint::Solid(color) => {
                let vertices: Vec<_> = points.iter().map(|p| self.device(*p)).collect();
                let style = ShapeStyle {
                    color: color.into(),
                    filled: true,
                    stroke_width: 1,
                };
                let mut backend = self.backend()?;
                backend
                    .fill_polygon(vertices, &style)
                    .map_err(backend_error)?;
                backend.present().map_err(backend_error)
            }
            Paint::Gradient(gradient) => {
                let scale = self.scale;
                let device_poly: Vec<Point> = points
                    .iter()
                    .map(|p| Point::new(p.x * scale, p.y * scale))
                    .collect();
                self.fill_gradient_rows(&device_poly, |y| gradient.color_at(y))
            }
        }
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let c = self.device(center);
        let r = self.device_len(radius);
        let style = ShapeStyle {
            color: color.into(),
            filled: true,
            stroke_width: 1,
        };
        let mut backend = self.backend()?;
        backend.draw_circle(c, r, &style, true).map_err(backend_error)?;
        backend.present().map_err(backend_error)
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        style: &StrokeStyle,
    ) -> Result<(), SurfaceError> {
        let c = self.device(center);
        let r = self.device_len(radius);
        let shape = ShapeStyle {
            color: style.color.into(),
            filled: false,
            stroke_width: self.device_len(style.width),
        };
        let mut backend = self.backend()?;
        backend.draw_circle(c, r, &shape, false).map_err(backend_error)?;
        backend.present().map_err(backend_error)
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<(), SurfaceError> {
        let pos = self.device(at);
        let font_style = if style.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        let color: RGBAColor = style.color.into();
        let text_style = FontDesc::new(
            FontFamily::SansSerif,
            style.size * self.scale,
            font_style,
        )
        .color(&color)
        .pos(text_anchor(style.align));

        let drawn = {
            let mut backend = self.backend()?;
            let drawn = backend.draw_text(text, &text_style, pos);
            backend.present().map_err(backend_error)?;
            drawn
        };

        // Text is best effort: hosts without usable fonts still get the
        // chart geometry.
        if let Err(e) = drawn {
            if !self.font_warning_logged {
                warn!(error = %e, "Text rendering unavailable, labels skipped");
                self.font_warning_logged = true;
            }
        }
        Ok(())
    }
}
