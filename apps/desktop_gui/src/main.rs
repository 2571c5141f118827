mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime};
use clap::Parser;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{DarsUploadApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "Upload a DARS report")]
struct Args {
    /// Ingestion server base URL. Without it, submissions are only logged.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let startup = StartupConfig {
        server_url: args.server_url.clone(),
        ..StartupConfig::default()
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(
        cmd_rx,
        ui_tx,
        runtime::IngestionTarget::from_server_url(args.server_url.as_deref()),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Upload DARS Report")
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([420.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Upload DARS Report",
        options,
        Box::new(move |_cc| Ok(Box::new(DarsUploadApp::new(cmd_tx, ui_rx, startup)))),
    )
}
