//! Paint styles passed by value to every draw call.

use plotters::style::RGBAColor;

/// Straight (non-premultiplied) RGBA color, alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation in straight RGBA space.
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl From<Color> for RGBAColor {
    fn from(c: Color) -> Self {
        RGBAColor(c.r, c.g, c.b, c.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<Dash>,
}

impl StrokeStyle {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Color, width: f64, dash: Dash) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// Vertical gradient from `from` at `y0` to `to` at `y1`, clamped outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub y0: f64,
    pub y1: f64,
    pub from: Color,
    pub to: Color,
}

impl LinearGradient {
    pub fn color_at(&self, y: f64) -> Color {
        let span = self.y1 - self.y0;
        if span == 0.0 {
            return self.from;
        }
        self.from.mix(self.to, (y - self.y0) / span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient(LinearGradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// `at` is the text's baseline point. The pixel surface approximates the
/// baseline with the bottom of the text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub bold: bool,
    pub align: TextAlign,
}
