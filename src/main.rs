//! WaveSense - Main Entry Point
//!
//! Opens every path given on the command line as a waveform card.

use anyhow::Context;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wavesense::{config, frontend::WaveSenseApp, loader::LoaderBridge, AppConfig};

const LOG_FILE_PREFIX: &str = "wavesense.log";

/// Console logging plus a daily log file when the data directory is usable
fn init_logging() -> Option<WorkerGuard> {
    let (file_layer, guard) = match config::log_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
    {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wavesense=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    tracing::info!("Starting WaveSense");

    let config = AppConfig::load_or_default();
    let initial: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let loader = LoaderBridge::spawn().context("Failed to start loader thread")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("WaveSense"),
        ..Default::default()
    };

    eframe::run_native(
        "WaveSense",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(WaveSenseApp::new(cc, config, loader, initial)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Viewer exited with error: {}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
