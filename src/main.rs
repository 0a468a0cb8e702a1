mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::RentalInsightsApp;
use config::AppConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_env()?;

    // The dataset is required before any window opens.
    let dataset = data::loader::load_file(&config.data_path).with_context(|| {
        format!("loading dataset from {}", config.data_path.display())
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let source = config.data_path.clone();
    let state = AppState::new(config, dataset, source);

    eframe::run_native(
        "Rental Insights",
        options,
        Box::new(|_cc| Ok(Box::new(RentalInsightsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
