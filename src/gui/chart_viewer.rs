//! Chart Viewer Widget
//! Hosts the animated chart in a fixed-height layout box and uploads the
//! pixel surface to a texture after each frame.

use egui::{Color32, ColorImage, RichText, TextureHandle, TextureOptions};
use mrr_chart::chart::{FrameInfo, MrrChart};
use mrr_chart::surface::{Canvas, PixelCanvas, Size, DEFAULT_BACKGROUND};
use tracing::{error, info};

const TEXTURE_NAME: &str = "mrr_chart";

/// The chart card. Idle until [`ChartViewer::start`] is called, then draws
/// one animation frame per repaint.
pub struct ChartViewer {
    height: f32,
    chart: Option<MrrChart<PixelCanvas>>,
    texture: Option<TextureHandle>,
    last_frame: Option<FrameInfo>,
    error: Option<String>,
}

impl ChartViewer {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            chart: None,
            texture: None,
            last_frame: None,
            error: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.chart.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.chart.as_ref().is_some_and(|c| !c.is_complete())
    }

    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame
    }

    /// Start the animation on a surface sized to the layout box. A chart
    /// that already ran keeps its surface, and with it the old pixels.
    pub fn start(&mut self, container: Size, pixel_ratio: f64) {
        let canvas = match self.chart.take() {
            Some(previous) => {
                let mut canvas = previous.into_canvas();
                canvas.set_container(container, pixel_ratio);
                canvas
            }
            None => PixelCanvas::new(container, pixel_ratio),
        };

        match MrrChart::start(canvas) {
            Ok(chart) => {
                info!(
                    width = container.width,
                    height = container.height,
                    pixel_ratio,
                    "Chart animation started"
                );
                self.last_frame = Some(chart.info());
                self.chart = Some(chart);
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "Chart failed to start");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Run the animation again on the same surface.
    pub fn replay(&mut self) {
        let Some(chart) = self.chart.as_ref() else {
            return;
        };
        let container = chart.layout().viewport;
        let pixel_ratio = chart.canvas().pixel_ratio();
        self.start(container, pixel_ratio);
    }

    /// Draw the next frame if the animation is running and refresh the
    /// texture. Call once per repaint.
    pub fn animate(&mut self, ctx: &egui::Context) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        let fresh = self.texture.is_none();
        if chart.is_complete() && !fresh {
            return;
        }

        if !chart.is_complete() {
            match chart.step() {
                Ok(info) => self.last_frame = Some(info),
                Err(e) => {
                    error!(error = %e, "Chart frame failed");
                    self.error = Some(e.to_string());
                    self.chart = None;
                    return;
                }
            }
        }

        let canvas = chart.canvas();
        let (width, height) = canvas.pixel_size();
        let image = ColorImage::from_rgb([width as usize, height as usize], canvas.rgb());
        if let Some(texture) = self.texture.as_mut() {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture(TEXTURE_NAME, image, TextureOptions::LINEAR));
        }

        if !chart.is_complete() {
            ctx.request_repaint();
        }
    }

    /// Lay out the chart box and paint the current texture into it.
    /// Returns the box in screen coordinates.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Rect {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, self.height), egui::Sense::hover());

        let bg = DEFAULT_BACKGROUND;
        ui.painter()
            .rect_filled(rect, 6.0, Color32::from_rgb(bg.r, bg.g, bg.b));

        if let Some(texture) = &self.texture {
            // The texture keeps the size the chart started at.
            let size = self
                .chart
                .as_ref()
                .map(|c| c.layout().viewport)
                .map(|v| egui::vec2(v.width as f32, v.height as f32))
                .unwrap_or(rect.size());
            let image_rect = egui::Rect::from_min_size(rect.min, size);
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if let Some(err) = &self.error {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("Chart unavailable: {}", err),
                egui::FontId::proportional(14.0),
                Color32::from_rgb(220, 53, 69),
            );
        }

        if let Some(info) = self.last_frame {
            ui.label(
                RichText::new(format!(
                    "Frame {} · {} of 24 months plotted",
                    info.frame, info.points
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
        rect
    }
}
