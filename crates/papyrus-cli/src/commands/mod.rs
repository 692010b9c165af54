//! CLI command definitions and dispatch.

pub mod agent;
pub mod favorite;
pub mod folder;
pub mod onboarding;
pub mod serve;
pub mod tree;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use papyrus_client::cache::FolderFavoritesCache;
use papyrus_client::{ControllerSettings, FolderController, HttpFolderStore, Outcome};
use papyrus_core::config::AppConfig;
use papyrus_core::error::{AppError, ErrorKind};

use crate::host::TerminalHost;
use crate::output::{self, OutputFormat};

/// Papyrus: regulatory agents organized in folders
#[derive(Debug, Parser)]
#[command(name = "papyrus", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Identity sent to the server, overriding `client.user_id`
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Log more (-v for info, -vv for debug); `RUST_LOG` wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Papyrus server
    Serve(serve::ServeArgs),
    /// Show the folder tree and the agents at a folder
    Tree(tree::TreeArgs),
    /// Move an agent into a folder, or to the root
    Mv(tree::MoveArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Star or unstar agents and folders
    Fav(favorite::FavoriteArgs),
    /// Agent catalog management
    Agent(agent::AgentArgs),
    /// Walk the company onboarding questionnaire
    Onboarding(onboarding::OnboardingArgs),
    /// User account management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let session = Session {
            config_path: &self.config,
            user: self.user.as_deref(),
            format: self.format,
        };
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Tree(args) => tree::execute(args, &session).await,
            Commands::Mv(args) => tree::execute_move(args, &session).await,
            Commands::Folder(args) => folder::execute(args, &session).await,
            Commands::Fav(args) => favorite::execute(args, &session).await,
            Commands::Agent(args) => agent::execute(args, &session).await,
            Commands::Onboarding(args) => onboarding::execute(args, &session).await,
            Commands::User(args) => user::execute(args, &self.config, self.format).await,
        }
    }
}

/// Global options shared by client commands.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    pub config_path: &'a str,
    pub user: Option<&'a str>,
    pub format: OutputFormat,
}

impl Session<'_> {
    /// Load configuration with the identity override applied.
    pub fn config(&self) -> Result<AppConfig, AppError> {
        let mut config = load_config(self.config_path)?;
        if let Some(user) = self.user {
            config.client.user_id = Some(user.to_string());
        }
        Ok(config)
    }

    /// HTTP store for the configured server.
    pub fn remote(&self) -> Result<(AppConfig, Arc<HttpFolderStore>), AppError> {
        let config = self.config()?;
        let remote = HttpFolderStore::new(&config.client)
            .map_err(|e| AppError::configuration(format!("Invalid client settings: {e}")))?;
        Ok((config, Arc::new(remote)))
    }

    /// Controller with the mirror loaded.
    pub async fn controller(&self) -> Result<FolderController, AppError> {
        let (config, remote) = self.remote()?;
        let controller = FolderController::new(
            remote,
            Arc::new(TerminalHost),
            FolderFavoritesCache::new(&config.client.state_dir),
            ControllerSettings::from(&config.client),
        );
        controller.init().await;
        Ok(controller)
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
        .map_err(|e| AppError::configuration(format!("Failed to load config: {e}")))
}

/// Turn a gesture outcome into the command result.
///
/// Toasts were already printed by the host.
pub fn report(outcome: Outcome) -> Result<(), AppError> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::Ignored => {
            output::print_warning("Sin cambios");
            Ok(())
        }
        Outcome::Denied(reason) => Err(AppError::authorization(reason)),
        Outcome::Failed(message) => Err(AppError::new(ErrorKind::ServiceUnavailable, message)),
        Outcome::Conflict { current_version } => {
            let mut err = AppError::conflict("La estructura ha cambiado en el servidor");
            err.current_version = current_version;
            Err(err)
        }
    }
}
