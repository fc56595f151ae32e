use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::{AnalyzerApp, PersistedSettings, SETTINGS_STORAGE_KEY};

/// Desktop client for the remote CSV analysis pipeline.
#[derive(Debug, Parser)]
#[command(name = "csv-analyzer", about = "Upload CSV files for remote analysis")]
struct Args {
    /// Credential endpoint override for local development.
    #[arg(long, default_value = analyzer_core::DEFAULT_TICKET_ENDPOINT)]
    endpoint: String,

    /// Tracing env-filter directive.
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_new(&args.log_filter)
        .with_context(|| format!("invalid --log-filter '{}'", args.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, args.endpoint);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CSV Analyzer")
            .with_inner_size([720.0, 560.0])
            .with_min_inner_size([560.0, 460.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CSV Analyzer",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedSettings>(&text).ok())
            });
            Ok(Box::new(AnalyzerApp::new(cmd_tx, ui_rx, persisted)))
        }),
    )
    .map_err(|err| anyhow!("failed to start the desktop UI: {err}"))
}
