//! Agent catalog CLI commands.

use clap::{Args, Subcommand};
use dialoguer::Confirm;

use papyrus_core::error::AppError;

use super::Session;
use crate::output;

/// Arguments for agent commands
#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Agent subcommand
    #[command(subcommand)]
    pub command: AgentCommand,
}

/// Agent subcommands
#[derive(Debug, Subcommand)]
pub enum AgentCommand {
    /// Delete an agent from the catalog
    Rm {
        /// Agent name
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute agent commands
pub async fn execute(args: &AgentArgs, session: &Session<'_>) -> Result<(), AppError> {
    match &args.command {
        AgentCommand::Rm { name, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("¿Eliminar el agente '{name}'?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;
                if !confirmed {
                    output::print_warning("Cancelado");
                    return Ok(());
                }
            }
            let controller = session.controller().await?;
            super::report(controller.delete_agent(name).await)
        }
    }
}
