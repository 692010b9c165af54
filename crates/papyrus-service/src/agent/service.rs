//! Agent catalog: listing, upserting and deleting agents.
//!
//! Deleting an agent also drops its folder assignment (a versioned change)
//! and removes it from the caller's favorite selection.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_database::store::WorkspaceStore;
use papyrus_entity::folder::AgentCatalog;
use papyrus_entity::history::HistoryAction;

use crate::commit::{Change, apply_change};
use crate::context::RequestContext;

/// Manages the agent catalog of the caller's workspace.
#[derive(Debug, Clone)]
pub struct AgentService {
    store: Arc<dyn WorkspaceStore>,
}

impl AgentService {
    /// Creates a new agent service.
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { store }
    }

    /// The full catalog.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<AgentCatalog> {
        Ok(self.store.load_workspace(ctx.workspace_id()).await?.agents)
    }

    /// Insert or replace an agent description.
    pub async fn upsert(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: serde_json::Value,
    ) -> AppResult<()> {
        require_editor(ctx)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("El nombre del agente es obligatorio"));
        }
        self.store
            .upsert_agent(ctx.workspace_id(), name, &description)
            .await?;
        info!(user_id = %ctx.user_id(), agent = name, "Agent saved");
        Ok(())
    }

    /// Delete an agent and its assignment. Returns the new structure version.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        expected_version: Option<u64>,
    ) -> AppResult<u64> {
        require_editor(ctx)?;

        let version = apply_change(
            self.store.as_ref(),
            ctx,
            expected_version,
            HistoryAction::RemoveAgent,
            |doc| {
                if doc.agents.remove(name).is_none() {
                    return Err(AppError::not_found(format!("Agente '{name}' no existe")));
                }
                let previous = doc.structure.asignaciones.remove(name).flatten();
                Ok(Change {
                    detail: json!({ "agente": name, "from": previous }),
                    remove_agent: Some(name.to_string()),
                })
            },
        )
        .await?;

        let mut selection = self.store.load_selection(ctx.user_id()).await?;
        if selection.iter().any(|s| s == name) {
            selection.retain(|s| s != name);
            if let Err(e) = self.store.save_selection(ctx.user_id(), &selection).await {
                warn!(user_id = %ctx.user_id(), agent = name, error = %e, "Failed to prune deleted agent from favorites");
            }
        }

        Ok(version)
    }
}

fn require_editor(ctx: &RequestContext) -> AppResult<()> {
    if ctx.user.can_assign_agents() {
        Ok(())
    } else {
        Err(AppError::authorization(
            "Sin permisos para editar agentes. Se requiere permiso admin o edición.",
        ))
    }
}
