//! Playback Bridge (fivesongs-bridge) - Main entry point
//!
//! Mediates between the fivesongs game process and the remote playback
//! provider: command API in, SSE events out, one device controller task in
//! the middle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fivesongs_bridge::api::{self, AppContext};
use fivesongs_bridge::config::Config;
use fivesongs_bridge::device::{ControllerConfig, DeviceController};
use fivesongs_bridge::sdk::simulated::SimulatedSdk;
use fivesongs_bridge::sdk::SdkGate;
use fivesongs_bridge::spotify::{self, SpotifyApi};
use fivesongs_bridge::state::SharedState;
use fivesongs_bridge::storage::KvStore;

/// Command-line arguments for fivesongs-bridge
#[derive(Parser, Debug)]
#[command(name = "fivesongs-bridge")]
#[command(about = "Playback bridge for the fivesongs game")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5731", env = "FIVESONGS_PORT")]
    port: u16,

    /// Data directory for the durable store
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Spotify Web API base URL
    #[arg(long, default_value = spotify::DEFAULT_API_BASE, env = "FIVESONGS_API_BASE")]
    api_base: String,

    /// Display name for the playback device
    #[arg(long, default_value = "5songs", env = "FIVESONGS_DEVICE_NAME")]
    device_name: String,

    /// Grace delay before confirming playback on external devices (ms)
    #[arg(long, default_value = "1500", env = "FIVESONGS_EXTERNAL_CONFIRM_MS")]
    external_confirm_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fivesongs_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let data_dir = fivesongs_common::config::resolve_data_dir(
        args.data_dir.as_deref(),
        "FIVESONGS_DATA_DIR",
    )
    .context("Failed to resolve data directory")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let config = Config {
        port: args.port,
        db_path: data_dir.join("fivesongs.db"),
        spotify_api_base: args.api_base,
        device_name: args.device_name,
        external_confirm_delay: Duration::from_millis(args.external_confirm_ms),
    };

    info!("Starting fivesongs playback bridge on port {}", config.port);
    info!("Durable store: {}", config.db_path.display());

    // Open the two storage scopes
    let durable = KvStore::open_durable(&config.db_path)
        .await
        .context("Failed to open durable store")?;
    let session = KvStore::open_in_memory()
        .await
        .context("Failed to open session store")?;

    // SDK capability gate; real provider integrations install their own
    // backend here, the binary ships with the simulated one
    let (sdk_gate, sdk_installer) = SdkGate::new();
    sdk_installer.install(SimulatedSdk::new());
    info!("Using simulated playback SDK backend");

    // Event broadcast and device controller
    let state = Arc::new(SharedState::new());
    let controller = DeviceController::spawn(
        ControllerConfig {
            device_name: config.device_name.clone(),
            external_confirm_delay: config.external_confirm_delay,
        },
        sdk_gate,
        SpotifyApi::new(config.spotify_api_base.clone()),
        state.event_tx.clone(),
    );

    // Build the application router
    let ctx = AppContext {
        state,
        controller,
        session,
        durable,
    };
    let app = api::create_router(ctx);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    // Create and run the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
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
