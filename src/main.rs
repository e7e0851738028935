mod app;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow};
use app::BikeDashApp;
use clap::Parser;
use cli::Options;
use data::service::DatasetService;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse();
    let config = options.resolve_config(std::env::var(cli::DATA_ENV).ok())?;
    let service = DatasetService::new(config.data_path.clone());

    if options.summary {
        let report = cli::summary(&config, &service)?;
        let json = serde_json::to_string_pretty(&report).context("serializing summary")?;
        println!("{json}");
        return Ok(());
    }

    let state = AppState::new(config, &service);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sri Lanka Used Bikes Dashboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(BikeDashApp::new(service, state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
