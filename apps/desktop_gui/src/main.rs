mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, OverlapPolicy};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::SearchApp;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the configured search service URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Overrides how overlapping searches are resolved.
    #[arg(long)]
    overlap_policy: Option<OverlapPolicy>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.search_base_url = url;
    }
    if let Some(policy) = args.overlap_policy {
        settings.overlap_policy = policy;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vibe Navigator")
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Vibe Navigator",
        options,
        Box::new(|_cc| Ok(Box::new(SearchApp::new(cmd_tx, ui_rx)))),
    )
}
