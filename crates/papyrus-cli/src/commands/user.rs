//! User account CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use papyrus_core::error::AppError;
use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_database::store::StoreManager;
use papyrus_entity::user::{AccountType, NewUser, Permission};
use papyrus_service::UserService;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Create or replace a user
    Add {
        /// Contact email
        email: String,
        /// Explicit user id (UUID)
        #[arg(long)]
        id: Option<String>,
        /// Account type: individual or empresa
        #[arg(long, default_value = "individual")]
        tipo: String,
        /// Company permission: admin, edicion or lectura
        #[arg(long)]
        permiso: Option<String>,
        /// Company name
        #[arg(long)]
        empresa: Option<String>,
        /// Shared company workspace id (UUID)
        #[arg(long)]
        workspace: Option<String>,
        /// Subscription plan
        #[arg(long, default_value = "plan1")]
        plan: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Account type
    tipo: String,
    /// Company permission
    permiso: String,
    /// Company
    empresa: String,
    /// Subscription plan
    plan: String,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    if config.store.provider == "memory" {
        output::print_warning("The memory store does not outlive this command");
    }
    let store = StoreManager::new(&config.store, &config.database).await?;
    let users = UserService::new(Arc::new(store));

    match &args.command {
        UserCommand::List => {
            let rows: Vec<UserRow> = users
                .list()
                .await?
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    tipo: u.tipo_cuenta.to_string(),
                    permiso: u.permiso.map(|p| p.to_string()).unwrap_or_default(),
                    empresa: u.empresa.clone().unwrap_or_default(),
                    plan: u.subscription_plan.clone(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Add {
            email,
            id,
            tipo,
            permiso,
            empresa,
            workspace,
            plan,
        } => {
            let new_user = NewUser {
                id: id.as_deref().map(parse_id::<UserId>).transpose()?,
                email: email.clone(),
                tipo_cuenta: tipo.parse::<AccountType>()?,
                permiso: permiso.as_deref().map(str::parse::<Permission>).transpose()?,
                empresa: empresa.clone(),
                estructura_empresa_id: workspace
                    .as_deref()
                    .map(parse_id::<WorkspaceId>)
                    .transpose()?,
                subscription_plan: plan.clone(),
            };
            let account = users.register(new_user).await?;
            output::print_success(&format!("User '{}' saved", account.email));
            output::print_kv("Id", &account.id.to_string());
        }
    }

    Ok(())
}

fn parse_id<T: std::str::FromStr<Err = uuid::Error>>(raw: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|e| AppError::validation(format!("Invalid id '{raw}': {e}")))
}
