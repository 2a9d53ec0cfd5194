mod app;
mod config;
mod data;
mod state;
mod ui;

use app::DspTallyApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "DSP Tally – Schedule Counter",
        options,
        Box::new(move |_cc| Ok(Box::new(DspTallyApp::new(&config)))),
    )
}
