pub mod api;
pub mod config;
pub mod models;
pub mod triage;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, TriageConfig};
use crate::triage::{DefaultTriageEngine, TriageError};

/// Fatal startup failures of the triage service.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine initialization failed: {0}")]
    Engine(#[from] TriageError),

    #[error("Server error: {0}")]
    Server(String),
}

/// Load configuration, models and tables, then serve the triage API until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = TriageConfig::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    let engine = DefaultTriageEngine::initialize(&config)?;

    let mut server = api::start_triage_api_server(Arc::new(engine), config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(addr = %server.session.server_addr, "Triage API listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| StartupError::Server(format!("Cannot listen for shutdown signal: {e}")))?;

    server.shutdown();
    server.stopped().await;
    Ok(())
}
