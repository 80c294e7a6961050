mod app;
mod cli;
mod config;
mod lesson;
mod progress;
mod scoring;
mod session;
mod state;
mod timeline;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging
    let default_filter = if cli.output.quiet {
        "electronics_universe=warn,warn"
    } else if cli.command.is_some() {
        "electronics_universe=info,warn"
    } else {
        "electronics_universe=debug,info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.command.is_some() {
        return cli::run(cli);
    }

    tracing::info!("Starting Electronics Universe");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 760.0])
        .with_min_inner_size([720.0, 560.0])
        .with_title("Electronics Universe");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Electronics Universe",
        native_options,
        Box::new(|cc| Ok(Box::new(app::EduApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
