//! Favorite agent selection with per-plan limits.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use papyrus_core::config::PlanLimits;
use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_database::store::WorkspaceStore;
use papyrus_entity::favorite::FavoriteKey;

use crate::context::RequestContext;

/// Reads and replaces the caller's favorite agents.
#[derive(Debug, Clone)]
pub struct SelectionService {
    store: Arc<dyn WorkspaceStore>,
    limits: Arc<PlanLimits>,
}

impl SelectionService {
    /// Creates a new selection service.
    pub fn new(store: Arc<dyn WorkspaceStore>, limits: Arc<PlanLimits>) -> Self {
        Self { store, limits }
    }

    /// The caller's favorite agents.
    pub async fn get(&self, ctx: &RequestContext) -> AppResult<Vec<String>> {
        self.store.load_selection(ctx.user_id()).await
    }

    /// Replace the caller's favorites.
    ///
    /// Folder keys are client-side state and are dropped; duplicates and
    /// blank names collapse. Returns the stored selection.
    pub async fn update(&self, ctx: &RequestContext, seleccion: Vec<String>) -> AppResult<Vec<String>> {
        let mut seen = BTreeSet::new();
        let agents: Vec<String> = seleccion
            .into_iter()
            .map(FavoriteKey::from)
            .filter_map(|key| match key {
                FavoriteKey::Agent(name) => {
                    let name = name.trim().to_string();
                    (!name.is_empty() && seen.insert(name.clone())).then_some(name)
                }
                FavoriteKey::Folder(_) => None,
            })
            .collect();

        if let Some(limit) = self.limits.limit_for(&ctx.user.subscription_plan) {
            if agents.len() > limit {
                return Err(AppError::validation(format!(
                    "Has superado el límite de agentes ({limit}) para tu plan"
                )));
            }
        }

        self.store.save_selection(ctx.user_id(), &agents).await?;
        info!(user_id = %ctx.user_id(), count = agents.len(), "Favorite agents updated");
        Ok(agents)
    }
}
