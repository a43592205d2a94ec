#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planning_board::config::BoardConfig;

mod app;
mod ui;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "planning_board=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();

    // planning-board [board.json | features.csv]
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = BoardConfig::load();
    tracing::info!(?path, month_width = config.month_width, "starting planning board");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Planning Board"),
        ..Default::default()
    };

    eframe::run_native(
        "Planning Board",
        options,
        Box::new(move |cc| Ok(Box::new(app::PlanningBoardApp::new(cc, config, path)))),
    )
}
