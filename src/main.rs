//! MRR Chart - Animated MRR vs Burn Rate landing page viewer
//!
//! Desktop host for the chart and the page behaviors around it.

mod gui;

use anyhow::Context as _;
use eframe::egui;
use gui::MrrChartApp;
use mrr_chart::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mrr_chart=info".parse()?)
                .add_directive("eframe=warn".parse()?),
        )
        .with_target(true)
        .init();

    let config = AppConfig::load().context("Failed to load settings")?;
    info!(?config, "Starting MRR chart viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("MRR vs Burn Rate"),
        ..Default::default()
    };

    eframe::run_native(
        "MRR vs Burn Rate",
        options,
        Box::new(move |cc| Ok(Box::new(MrrChartApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {e}"))
}
