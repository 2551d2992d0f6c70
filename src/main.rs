mod app;
mod color;
mod ui;

use anyhow::Context;
use app::ClaimsExplorerApp;
use claims_explorer::config::AppConfig;
use claims_explorer::data::loader::DatasetCache;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::resolve(std::env::args().skip(1)).context("loading settings")?;
    log::info!("Dataset: {}", config.data_path.display());
    let cache = DatasetCache::new(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Claims & Climate Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ClaimsExplorerApp::new(config, cache)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
