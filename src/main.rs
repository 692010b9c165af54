//! Papyrus server: folder store for regulatory agents.
//!
//! Main entry point that loads configuration, selects the workspace store
//! and starts the HTTP API.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use papyrus_core::config::{AppConfig, LogFormat};
use papyrus_core::error::AppError;
use papyrus_database::store::StoreManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file, or from the environment profile
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("PAPYRUS_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("PAPYRUS_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter()));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.provider,
        "Starting Papyrus"
    );

    let store = StoreManager::new(&config.store, &config.database).await?;
    papyrus_api::run_server(config, Arc::new(store)).await
}
