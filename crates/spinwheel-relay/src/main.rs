//! Spinwheel relay binary.
//!
//! Receives webhook calls from the live-stream automation platform,
//! maps each one to a prize segment, and pushes the resulting spin to
//! every connected viewer.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Open the segment store (seeding defaults on first run)
//! 4. Start the event log writer
//! 5. Serve HTTP + `WebSocket` until `Ctrl-C`
//! 6. Drain the event log writer

mod error;

use std::sync::Arc;

use spinwheel_core::{EventLogger, SegmentStore};
use spinwheel_gateway::{AppState, GatewayConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::RelayError;

/// Application entry point for the relay.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself fails.
#[tokio::main]
async fn main() -> Result<(), RelayError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("spinwheel-relay starting");

    // 2. Load configuration.
    let config = GatewayConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        data_dir = %config.data_dir.display(),
        client_origins = ?config.client_origins,
        webhook_secret = config.webhook_secret.is_some(),
        "Configuration loaded"
    );

    // 3. Open the segment store.
    let store = Arc::new(SegmentStore::open(config.segments_path())?);

    // 4. Start the event log writer.
    let (event_log, writer) = EventLogger::spawn(config.events_log_path());
    info!(path = %config.events_log_path().display(), "Event log writer started");

    // 5. Serve until Ctrl-C.
    let state = Arc::new(AppState::new(config.clone(), store, event_log));
    start_server(&config, Arc::clone(&state)).await?;

    // 6. Viewer sockets may still hold the state; stop the writer explicitly.
    state.event_log.close();
    writer.await.map_err(|e| RelayError::EventLog {
        message: format!("{e}"),
    })?;

    info!("spinwheel-relay stopped");
    Ok(())
}
