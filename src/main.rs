mod app;
mod ui;

use std::path::PathBuf;

use app::RustyPlayApp;
use eframe::egui;
use rusty_play::config::DashboardConfig;
use rusty_play::state::DashboardState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::error!("Ignoring config: {e:#}");
        DashboardConfig::default()
    });

    let mut state = DashboardState::new(&config);
    // A dataset path on the command line wins over the config file.
    let data_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.data_path.clone());
    if let Some(path) = data_path {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Play – App Store Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RustyPlayApp { state }))),
    )
}
