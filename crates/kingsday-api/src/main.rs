//! Server binary for the Kingsday board game.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `kingsday.yaml` (env overrides apply)
//! 3. Create the game store over the configured data directory
//! 4. Serve the API until the process is terminated

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use kingsday_api::AppState;
use kingsday_api::server::start_server;
use kingsday_core::GameConfig;
use kingsday_store::GameStore;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the server cannot bind or fails while serving.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("kingsday-api starting");

    let config = GameConfig::load_or_default(Path::new("kingsday.yaml"));
    info!(
        data_dir = %config.data_dir.display(),
        host = config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let store = GameStore::new(config.data_dir.clone());
    let roles = store.list_roles();
    info!(roles = roles.len(), "Role content discovered");

    let state = Arc::new(AppState::new(store, config.game.clone()));
    start_server(&config.server, state).await?;

    Ok(())
}
