use std::sync::Arc;

use clap::Parser;
use peer_registry_core::JsonFileStore;
use peer_registry_server::{
    config::{ServerConfig, DEFAULT_LOG_FILTER},
    router, AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let working_dir = std::env::current_dir()?;
    let data_file = config.data_file_in(&working_dir);
    if !data_file.exists() {
        tracing::warn!(path = %data_file.display(), "User data file not found; registrations will fail until it exists");
    }

    let store = Arc::new(JsonFileStore::new(data_file.clone()));
    let app = router(Arc::new(AppState::new(store)));

    tracing::info!(
        addr = %config.bind_address,
        data_file = %data_file.display(),
        "Starting peer registry server"
    );

    let listener = match tokio::net::TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%e, addr = %config.bind_address, "Failed to bind");
            return Err(e);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(%e, addr = %config.bind_address);
        return Err(e);
    }

    Ok(())
}
