//! ecoscan - command-line front end for the EcoScan classifier client
//!
//! Logs go to stderr; stdout carries the rendered result card and history,
//! produced by draining the event bus after each command.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecoscan_client::{
    ClassificationSession, FixedPosition, HistoryLedger, HttpClassifier, ImageUpload,
    LocationProvider, PositionSource,
};
use ecoscan_common::config::{load_toml_config, ClientConfig, ConfigOverrides};
use ecoscan_common::events::{EcoScanEvent, EventBus};
use ecoscan_common::{Coordinates, HistoryView, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{prelude::*, reload, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ecoscan", version, about = "Classify waste items from photos")]
struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classifier endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Folder holding the history database
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify an image and record the result
    Classify {
        image: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Do not send any location, even if one is configured
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        no_location: bool,
    },

    /// Show recent classifications and counters
    History,

    /// Delete all history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging starts at "info" until the TOML level is known; RUST_LOG wins
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let toml_config = load_toml_config(cli.config.as_deref())?;
    if !from_env {
        filter_handle.reload(EnvFilter::new(&toml_config.logging.level))?;
    }

    info!(
        "Starting EcoScan v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ClientConfig::resolve(
        ConfigOverrides {
            endpoint: cli.endpoint.clone(),
            root_folder: cli.root_folder.clone(),
        },
        toml_config,
    )?;
    let store = SqliteStore::open(&config.database_path()).await?;
    let ledger = HistoryLedger::with_capacity(Arc::new(store), config.max_history);
    info!("History capacity: {}", ledger.capacity());

    let event_bus = EventBus::new(64);
    let mut rx = event_bus.subscribe();

    let position = match &cli.command {
        Command::Classify { no_location: true, .. } => None,
        Command::Classify {
            lat: Some(lat),
            lon: Some(lon),
            ..
        } => Some(Coordinates { lat: *lat, lon: *lon }),
        _ => config.location.map(|l| Coordinates { lat: l.lat, lon: l.lon }),
    };
    let source = position.map(|c| Arc::new(FixedPosition(c)) as Arc<dyn PositionSource>);
    let location = Arc::new(LocationProvider::new(source, event_bus.clone()));
    info!(supported = location.is_supported(), "Location capability");

    let classifier = HttpClassifier::new(config.endpoint.clone(), config.request_timeout)?;
    info!("Classifier endpoint: {}", classifier.endpoint());
    let session =
        ClassificationSession::new(Arc::new(classifier), ledger, location.clone(), event_bus);

    match cli.command {
        Command::Classify { image, .. } => {
            let upload = ImageUpload::from_path(&image).await?;

            let cancel = CancellationToken::new();
            let ctrl_c = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                })
            };
            location
                .request_location(config.location_timeout, &cancel)
                .await;
            ctrl_c.abort();

            session.classify(upload).await?;
        }
        Command::History => {
            session.refresh_history().await?;
        }
        Command::Clear => {
            session.clear_history().await?;
        }
    }

    render_events(&mut rx);
    Ok(())
}

/// Print everything published so far
fn render_events(rx: &mut broadcast::Receiver<EcoScanEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            EcoScanEvent::ImageSelected {
                file_name,
                size_bytes,
                mime_type,
            } => println!("Image: {} ({} bytes, {})", file_name, size_bytes, mime_type),
            EcoScanEvent::ClassificationStarted { .. } => println!("Classifying..."),
            EcoScanEvent::ResultReady { result, .. } => {
                println!();
                println!("  {}", result.name);
                println!("  [{}] {}", result.class_name, result.category);
                println!("  {}", result.instructions);
                println!("  Tip: {}", result.tip);
                println!();
            }
            EcoScanEvent::HistoryUpdated { view } => print_history(&view),
            EcoScanEvent::LocationStatusChanged { status } => println!("Location: {}", status),
        }
    }
}

fn print_history(view: &HistoryView) {
    println!("History:");
    if view.summaries.is_empty() {
        println!("  (empty)");
    }
    for summary in &view.summaries {
        println!("  {}", summary);
    }
    println!(
        "Recycled: {}  Composted: {}",
        view.aggregates.recycled_count, view.aggregates.composted_count
    );
}
