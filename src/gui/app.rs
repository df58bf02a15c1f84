//! MRR Chart Main Application
//! Nav bar, control panel, and the scrolling page with the chart section.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Align, Color32, RichText, SidePanel};
use mrr_chart::chart::series::{first_month_above, COST, MONTHS, REVENUE};
use mrr_chart::chart::{BREAK_EVEN_INDEX, COST_COLOR, REVENUE_COLOR};
use mrr_chart::config::AppConfig;
use mrr_chart::export::{export_frames_with_progress, ExportProgress, ExportedFrames};
use mrr_chart::page::nav::Section;
use mrr_chart::page::tabs::TabGroup;
use mrr_chart::page::tooltip::TOOLTIP_WIDTH;
use mrr_chart::page::{CounterElement, Page, PageElements, PageError, PageEvent, Subscriptions};
use mrr_chart::surface::{Rect, Size};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const OVERVIEW: &str = "overview";
const CHART: &str = "chart";
const DETAILS: &str = "details";
const CHART_ID: &str = "mrr-chart";
const DETAILS_TABS: usize = 0;
const TAB_DATA: &str = "tab-data";
const TAB_ASSUMPTIONS: &str = "tab-assumptions";

/// Below this width the nav links collapse behind the menu button.
const NARROW_WIDTH: f32 = 720.0;

struct StatCard {
    id: &'static str,
    label: &'static str,
    count: &'static str,
    prefix: &'static str,
    suffix: &'static str,
    tooltip: &'static str,
}

const STAT_CARDS: [StatCard; 4] = [
    StatCard {
        id: "stat-mrr",
        label: "MRR at month 24",
        count: "160",
        prefix: "$",
        suffix: "K",
        tooltip: "Monthly recurring revenue after the enterprise tier ramps up in year 2.",
    },
    StatCard {
        id: "stat-burn",
        label: "Monthly burn",
        count: "45",
        prefix: "$",
        suffix: "K",
        tooltip: "Flat operating cost: team, infrastructure and go-to-market.",
    },
    StatCard {
        id: "stat-break-even",
        label: "Break-even",
        count: "15",
        prefix: "M",
        suffix: "",
        tooltip: "First month where MRR clears the burn rate. The chart marker sits at month 19.",
    },
    StatCard {
        id: "stat-growth",
        label: "Year 2 growth",
        count: "4.8",
        prefix: "",
        suffix: "x",
        tooltip: "Month-24 MRR over month-12 MRR.",
    },
];

/// Export result from background thread
enum ExportResult {
    Progress(f32, String),
    Complete(ExportedFrames),
    Error(String),
}

/// Main application window.
pub struct MrrChartApp {
    page: Page,
    /// Dropping this detaches every page listener.
    _subscriptions: Subscriptions,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    sections: Vec<Section>,
    scroll_target: Option<String>,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl MrrChartApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, PageError> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let elements = PageElements {
            has_nav_toggle: true,
            nav_links: [OVERVIEW, CHART, DETAILS]
                .iter()
                .map(|id| format!("#{}", id))
                .collect(),
            reveals: vec![OVERVIEW.into(), CHART.into(), DETAILS.into()],
            counters: STAT_CARDS
                .iter()
                .map(|card| CounterElement {
                    id: card.id.into(),
                    count: card.count.into(),
                    prefix: card.prefix.into(),
                    suffix: card.suffix.into(),
                })
                .collect(),
            tab_groups: vec![TabGroup::from_labels(&[
                ("📋 Monthly data", TAB_DATA),
                ("📝 Assumptions", TAB_ASSUMPTIONS),
            ])],
            tooltips: STAT_CARDS.iter().map(|card| card.id.into()).collect(),
            chart: Some(CHART_ID.into()),
        };
        let (page, subscriptions) = Page::init(elements)?;

        Ok(Self {
            control_panel: ControlPanel::new(config.export.clone()),
            chart_viewer: ChartViewer::new(config.chart_height),
            page,
            _subscriptions: subscriptions,
            sections: Vec::new(),
            scroll_target: None,
            export_rx: None,
            is_exporting: false,
        })
    }

    fn handle_page_events(
        &mut self,
        ctx: &egui::Context,
        events: Vec<PageEvent>,
        rect: egui::Rect,
    ) {
        for event in events {
            match event {
                PageEvent::ChartVisible(_) => {
                    let size = Size::new(rect.width() as f64, rect.height() as f64);
                    self.chart_viewer.start(size, ctx.pixels_per_point() as f64);
                    self.control_panel.replay_enabled = self.chart_viewer.is_started();
                    self.control_panel.set_progress(0.0, "Chart running");
                }
                PageEvent::CounterStarted(id) => debug!(counter = %id, "Counter started"),
                PageEvent::Revealed(id) => debug!(section = %id, "Section revealed"),
            }
        }
    }

    /// Start frame export in a background thread
    fn handle_export_frames(&mut self) {
        if self.is_exporting {
            return;
        }

        let Some(folder) = rfd::FileDialog::new()
            .set_title("Choose where to export the chart frames")
            .pick_folder()
        else {
            return; // User cancelled
        };

        let dir = folder.join(&self.control_panel.export.output_dir);
        let export = self.control_panel.export.clone();
        info!(dir = %dir.display(), "Exporting chart frames");

        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;
        self.control_panel.export_enabled = false;
        self.control_panel.set_progress(5.0, "Rendering frames...");

        thread::spawn(move || {
            let result = export_frames_with_progress(&dir, &export, |progress| {
                let ExportProgress { done, total } = progress;
                let _ = tx.send(ExportResult::Progress(
                    5.0 + 95.0 * done as f32 / total as f32,
                    format!("Wrote frame {}/{}...", done, total),
                ));
            });

            let _ = match result {
                Ok(exported) => tx.send(ExportResult::Complete(exported)),
                Err(e) => tx.send(ExportResult::Error(e.to_string())),
            };
        });
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let rx = self.export_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    ExportResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    ExportResult::Complete(exported) => {
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Exported {} frames", exported.frames.len()),
                        );
                        self.control_panel.last_export_dir =
                            exported.final_image.parent().map(|p| p.to_path_buf());
                        self.finish_export();
                        should_keep_receiver = false;
                    }
                    ExportResult::Error(error) => {
                        warn!(%error, "Frame export failed");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.finish_export();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.export_rx = Some(rx);
            }
        }
    }

    fn finish_export(&mut self) {
        self.is_exporting = false;
        self.control_panel.export_enabled = true;
    }

    fn handle_open_export_dir(&mut self) {
        let Some(dir) = self.control_panel.last_export_dir.clone() else {
            return;
        };
        if let Err(e) = open::that(&dir) {
            warn!(error = %e, dir = %dir.display(), "Could not open export folder");
            self.control_panel
                .set_progress(100.0, &format!("Error opening folder: {}", e));
        }
    }

    fn show_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            let narrow = ui.available_width() < NARROW_WIDTH;
            ui.horizontal(|ui| {
                ui.label(RichText::new("MRR vs Burn").size(16.0).strong());
                ui.add_space(20.0);
                if narrow {
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("☰").clicked() {
                            self.page.toggle_nav();
                        }
                    });
                } else {
                    self.show_nav_links(ui);
                }
            });
            if narrow && self.page.nav().is_open() {
                ui.vertical(|ui| self.show_nav_links(ui));
            }
        });
    }

    fn show_nav_links(&mut self, ui: &mut egui::Ui) {
        for href in self.page.nav_links().to_vec() {
            let id = href.trim_start_matches('#');
            let active = self.page.is_link_active(&href);
            if ui.selectable_label(active, section_title(id)).clicked() {
                self.page.click_nav_link();
                self.scroll_target = Some(id.to_string());
            }
        }
    }

    fn show_page(&mut self, ui: &mut egui::Ui) {
        let viewport = to_rect(ui.clip_rect());
        let origin = ui.min_rect().top();
        let mut sections = Vec::with_capacity(3);

        for id in [OVERVIEW, CHART, DETAILS] {
            if self.scroll_target.as_deref() == Some(id) {
                ui.scroll_to_cursor(Some(Align::TOP));
                self.scroll_target = None;
            }
            sections.push(Section::new(id, (ui.cursor().top() - origin) as f64));

            let revealed = self.page.is_revealed(id);
            let rect = ui
                .scope(|ui| {
                    if !revealed {
                        ui.set_opacity(0.15);
                    }
                    ui.heading(section_title(id));
                    ui.add_space(8.0);
                    match id {
                        OVERVIEW => self.show_overview(ui, viewport),
                        CHART => self.show_chart(ui, viewport),
                        _ => self.show_details(ui),
                    }
                    ui.add_space(40.0);
                })
                .response
                .rect;

            let events = self.page.observe(id, to_rect(rect), viewport);
            self.handle_page_events(ui.ctx(), events, rect);
        }
        self.sections = sections;
    }

    fn show_overview(&mut self, ui: &mut egui::Ui, viewport: Rect) {
        let ctx = ui.ctx().clone();
        ui.horizontal_wrapped(|ui| {
            for card in &STAT_CARDS {
                let text = self.page.counter_text(card.id).unwrap_or_default();
                let response = egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(160.0);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(text).size(26.0).strong().color(Color32::WHITE));
                            ui.label(RichText::new(card.label).size(12.0).color(Color32::GRAY));
                        });
                    })
                    .response;

                let events = self.page.observe(card.id, to_rect(response.rect), viewport);
                self.handle_page_events(&ctx, events, response.rect);

                if response.hovered() {
                    let screen_width = ctx.screen_rect().width() as f64;
                    if let Some(pos) =
                        self.page
                            .tooltip_position(card.id, to_rect(response.rect), screen_width)
                    {
                        show_tooltip(&ctx, card, egui::pos2(pos.x as f32, pos.y as f32));
                    }
                }
                ui.add_space(10.0);
            }
        });
    }

    fn show_chart(&mut self, ui: &mut egui::Ui, viewport: Rect) {
        ui.label(
            RichText::new(format!(
                "Revenue overtakes a flat burn rate in month {}.",
                break_even_month()
            ))
                .size(13.0)
                .color(Color32::GRAY),
        );
        ui.add_space(8.0);
        let rect = self.chart_viewer.show(ui);
        let events = self.page.observe(CHART_ID, to_rect(rect), viewport);
        self.handle_page_events(&ui.ctx().clone(), events, rect);
    }

    fn show_details(&mut self, ui: &mut egui::Ui) {
        let Some(group) = self.page.tab_group(DETAILS_TABS) else {
            return;
        };
        let buttons: Vec<(String, bool)> = group
            .buttons()
            .iter()
            .map(|b| (b.label.clone(), group.is_panel_active(&b.panel)))
            .collect();

        let mut clicked = None;
        ui.horizontal(|ui| {
            for (i, (label, active)) in buttons.iter().enumerate() {
                if ui.selectable_label(*active, label).clicked() {
                    clicked = Some(i);
                }
            }
        });
        if let Some(i) = clicked {
            if let Err(e) = self.page.click_tab(DETAILS_TABS, i) {
                warn!(error = %e, "Tab click ignored");
            }
        }
        ui.add_space(10.0);

        let panel = self
            .page
            .tab_group(DETAILS_TABS)
            .and_then(|g| g.active_panel())
            .map(str::to_string);
        match panel.as_deref() {
            Some(TAB_DATA) => monthly_table(ui),
            Some(TAB_ASSUMPTIONS) => assumptions(ui),
            _ => {}
        }
    }
}

impl eframe::App for MrrChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();

        let dt = ctx.input(|i| i.stable_dt);
        self.page.tick(Duration::from_secs_f32(dt.max(0.0)));
        self.chart_viewer.animate(ctx);

        // Request repaint while counters run or an export is in flight
        if self.is_exporting || self.page.counters_running() {
            ctx.request_repaint();
        }

        self.show_nav(ctx);

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.chart_viewer.last_frame());

                    match action {
                        ControlPanelAction::Replay => self.chart_viewer.replay(),
                        ControlPanelAction::ExportFrames => self.handle_export_frames(),
                        ControlPanelAction::OpenExportDir => self.handle_open_export_dir(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let output = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_page(ui));
            let scroll_y = output.state.offset.y as f64;
            self.page.scroll(scroll_y, &self.sections);
        });

        if self.chart_viewer.is_animating() {
            ctx.request_repaint();
        }
    }
}

fn to_rect(rect: egui::Rect) -> Rect {
    Rect::new(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.width() as f64,
        rect.height() as f64,
    )
}

fn section_title(id: &str) -> &'static str {
    match id {
        OVERVIEW => "Overview",
        CHART => "MRR vs Burn",
        _ => "Details",
    }
}

fn show_tooltip(ctx: &egui::Context, card: &StatCard, pos: egui::Pos2) {
    egui::Area::new(egui::Id::new(("tooltip", card.id)))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(TOOLTIP_WIDTH as f32 - 16.0);
                ui.label(RichText::new(card.label).strong());
                ui.label(card.tooltip);
            });
        });
}

fn to_color32(color: mrr_chart::surface::Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn monthly_table(ui: &mut egui::Ui) {
    egui::Grid::new("monthly_data")
        .striped(true)
        .num_columns(4)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Month").strong());
            ui.label(RichText::new("MRR").strong().color(to_color32(REVENUE_COLOR)));
            ui.label(RichText::new("Burn").strong().color(to_color32(COST_COLOR)));
            ui.label(RichText::new("Net").strong());
            ui.end_row();

            let crossing = first_month_above(&REVENUE, &COST);
            for month in 0..MONTHS {
                let net = REVENUE[month] - COST[month];
                let marker = if Some(month) == crossing { " ⬆" } else { "" };
                ui.label(format!("M{}{}", month + 1, marker));
                ui.label(format!("${}K", REVENUE[month]));
                ui.label(format!("${}K", COST[month]));
                let color = if net >= 0.0 {
                    Color32::from_rgb(16, 185, 129)
                } else {
                    Color32::from_rgb(244, 63, 94)
                };
                ui.label(RichText::new(format!("{:+}K", net)).color(color));
                ui.end_row();
            }
        });
}

fn assumptions(ui: &mut egui::Ui) {
    for line in [
        "Year 1 sells self-serve SaaS plans; year 2 adds enterprise contracts.",
        "Burn stays flat at about $45K per month for the whole period.",
        "Figures are monthly, in thousands of dollars.",
    ] {
        ui.label(format!("• {}", line));
    }
    ui.label(format!(
        "• MRR first exceeds burn in month {}. The chart's break-even marker is pinned at month {}.",
        break_even_month(),
        BREAK_EVEN_INDEX + 1
    ));
}

/// 1-based month where revenue first exceeds burn.
fn break_even_month() -> usize {
    first_month_above(&REVENUE, &COST).map_or(MONTHS, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_even_card_matches_series() {
        let card = STAT_CARDS
            .iter()
            .find(|card| card.id == "stat-break-even")
            .unwrap();
        assert_eq!(card.count, break_even_month().to_string());
        assert_eq!(break_even_month(), 15);
    }
}
