//! Folder management CLI commands.

use clap::{Args, Subcommand};

use papyrus_core::error::AppError;
use papyrus_entity::folder::FolderId;

use super::Session;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    New {
        /// Folder name
        nombre: String,
        /// Parent folder id; the root when omitted
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder
    Rename {
        /// Folder id
        id: String,
        /// New name
        nombre: String,
    },
    /// Move a folder under another one, or to the root
    Mv {
        /// Folder id
        id: String,
        /// New parent id; the root when omitted
        parent: Option<String>,
    },
    /// Delete an empty folder
    Rm {
        /// Folder id
        id: String,
    },
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, session: &Session<'_>) -> Result<(), AppError> {
    let controller = session.controller().await?;

    let outcome = match &args.command {
        FolderCommand::New { nombre, parent } => {
            if let Some(parent) = parent {
                controller
                    .enter_folder(Some(FolderId::from(parent.as_str())))
                    .await;
            }
            controller.create_folder(nombre).await
        }
        FolderCommand::Rename { id, nombre } => {
            controller
                .rename_folder(&FolderId::from(id.as_str()), nombre)
                .await
        }
        FolderCommand::Mv { id, parent } => {
            let parent = parent.as_deref().map(FolderId::from);
            controller
                .move_folder(&FolderId::from(id.as_str()), parent.as_ref())
                .await
        }
        FolderCommand::Rm { id } => controller.delete_folder(&FolderId::from(id.as_str())).await,
    };

    super::report(outcome)
}
