//! Start the Papyrus server.

use std::sync::Arc;

use clap::Args;

use papyrus_core::error::AppError;
use papyrus_database::store::StoreManager;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the store provider (`memory` or `postgres`)
    #[arg(long)]
    pub store: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref store) = args.store {
        config.store.provider = store.clone();
    }

    println!("Starting Papyrus server...");
    println!("  Host:  {}", config.server.host);
    println!("  Port:  {}", config.server.port);
    println!("  Store: {}", config.store.provider);

    let store = StoreManager::new(&config.store, &config.database).await?;
    papyrus_api::run_server(config, Arc::new(store)).await
}
