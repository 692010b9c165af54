//! Favorites CLI commands.

use clap::{Args, Subcommand};

use papyrus_core::error::AppError;
use papyrus_entity::folder::FolderId;

use super::Session;
use crate::output;

/// Arguments for favorite commands
#[derive(Debug, Args)]
pub struct FavoriteArgs {
    /// Favorite subcommand
    #[command(subcommand)]
    pub command: FavoriteCommand,
}

/// Favorite subcommands
#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    /// Star or unstar an agent
    Agent {
        /// Agent name
        name: String,
    },
    /// Star or unstar a folder and everything below it
    Folder {
        /// Folder id
        id: String,
    },
}

/// Execute favorite commands
pub async fn execute(args: &FavoriteArgs, session: &Session<'_>) -> Result<(), AppError> {
    let controller = session.controller().await?;

    let outcome = match &args.command {
        FavoriteCommand::Agent { name } => controller.toggle_agent_favorite(name).await,
        FavoriteCommand::Folder { id } => {
            controller
                .toggle_folder_favorite(&FolderId::from(id.as_str()))
                .await
        }
    };
    super::report(outcome)?;

    let favorites = controller.snapshot().await.favorites;
    output::print_kv("Agentes favoritos", &favorites.agents().join(", "));
    Ok(())
}
