//! Queue Daemon (spinq-qd) - Main entry point
//!
//! Runs the media queue engine: resolves track metadata, preloads payloads
//! into the on-disk cache, drives playback through the voice output, and
//! persists queue state across restarts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spinq_common::EventBus;
use spinq_qd::config::{Config, Overrides};
use spinq_qd::playback::Engine;
use spinq_qd::provider::HttpProvider;
use spinq_qd::transport::{LoggingMessenger, LoggingVoice};

/// Command-line arguments for spinq-qd
#[derive(Parser, Debug)]
#[command(name = "spinq-qd")]
#[command(about = "Media queue daemon for Spinq")]
#[command(version)]
struct Args {
    /// Directory for cached track payloads
    #[arg(short, long, env = "SPINQ_MUSIC_DIR")]
    music_dir: Option<PathBuf>,

    /// Path to the queue state snapshot file
    #[arg(short, long, env = "SPINQ_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Base URL of the media provider service
    #[arg(short, long, env = "SPINQ_PROVIDER_URL")]
    provider_url: Option<String>,

    /// Enable autoplay from the persisted playlist when the backlog drains
    #[arg(long, env = "SPINQ_AUTOPLAY")]
    autoplay: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spinq_qd=debug,spinq_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = Config::resolve(Overrides {
        music_dir: args.music_dir,
        state_file: args.state_file,
        provider_url: args.provider_url,
        autoplay: args.autoplay.then_some(true),
        ..Overrides::default()
    })
    .context("Failed to load configuration")?;

    info!("Starting Spinq queue daemon");
    info!("Music cache: {}", config.music_dir.display());
    info!("State file: {}", config.state_file.display());
    info!("Provider: {}", config.provider_url);

    let provider = Arc::new(HttpProvider::new(&config.provider_url));
    let voice = Arc::new(LoggingVoice::default());
    let messenger = Arc::new(LoggingMessenger::default());
    let bus = Arc::new(EventBus::new(1000));

    let (engine, handle) = Engine::new(&config, provider, voice, messenger, bus)
        .await
        .context("Failed to initialize queue engine")?;
    info!("Queue engine initialized");

    let engine_task = tokio::spawn(engine.run());

    // The logging transports are always up.
    handle.notify_connected(false);

    shutdown_signal().await;

    drop(handle);
    engine_task.await.context("Engine task panicked")?;

    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
