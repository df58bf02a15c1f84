//! Control Panel Widget
//! Left side panel with chart playback and frame export controls.

use egui::{Color32, RichText};
use mrr_chart::chart::FrameInfo;
use mrr_chart::config::ExportConfig;
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub export: ExportConfig,
    pub last_export_dir: Option<PathBuf>,
    pub progress: f32,
    pub status: String,
    pub replay_enabled: bool,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(export: ExportConfig) -> Self {
        Self {
            export,
            last_export_dir: None,
            progress: 0.0,
            status: "Scroll to the chart to start it".to_string(),
            replay_enabled: false,
            export_enabled: true,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, frame: Option<FrameInfo>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 MRR vs Burn")
                    .size(22.0)
                    .color(Color32::from_rgb(59, 130, 246)),
            );
            ui.label(RichText::new("24-month outlook").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Playback =====
        ui.label(RichText::new("▶ Playback").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let text = match frame {
                    Some(info) => format!(
                        "Frame {}/60 · eased {:.3} · {} points",
                        info.frame, info.eased, info.points
                    ),
                    None => "Not started".to_string(),
                };
                ui.label(RichText::new(text).size(12.0));
                ui.add_space(5.0);
                ui.add_enabled_ui(self.replay_enabled, |ui| {
                    if ui.button("🔁 Replay").clicked() {
                        action = ControlPanelAction::Replay;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.label(RichText::new("🖼 Frame Export").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Width:"));
            ui.add(egui::DragValue::new(&mut self.export.width).range(100.0..=2000.0));
        });
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Height:"));
            ui.add(egui::DragValue::new(&mut self.export.height).range(100.0..=2000.0));
        });
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Pixel ratio:"));
            ui.add(
                egui::DragValue::new(&mut self.export.pixel_ratio)
                    .range(1.0..=4.0)
                    .speed(0.25),
            );
        });

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export Frames").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportFrames;
                }
            });

            if self.last_export_dir.is_some() {
                ui.add_space(5.0);
                if ui.button("📂 Open Folder").clicked() {
                    action = ControlPanelAction::OpenExportDir;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(16, 185, 129)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Replay,
    ExportFrames,
    OpenExportDir,
}
