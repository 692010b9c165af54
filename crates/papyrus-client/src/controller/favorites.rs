//! Favorite toggles with persist-or-revert.

use tracing::{debug, warn};

use papyrus_entity::folder::FolderId;

use super::{FAVORITES_FAILED, FolderController, Outcome};
use crate::error::RemoteResult;
use crate::favorites::{self, FavoritesChange};
use crate::host::ToastKind;

impl FolderController {
    /// Star or unstar a folder and every agent below it.
    pub async fn toggle_folder_favorite(&self, id: &FolderId) -> Outcome {
        let changes = {
            let mut state = self.state.write().await;
            if !state.structure.contains(id) {
                return Outcome::Ignored;
            }
            let toggled = {
                let state = &mut *state;
                favorites::toggle_folder(&mut state.favorites, &state.structure, id)
            };
            let propagated = state.propagate_favorites(self.settings.favorites_scope);
            vec![toggled, propagated]
        };
        self.commit_favorites(changes).await
    }

    /// Star or unstar one agent, then re-derive folder keys.
    pub async fn toggle_agent_favorite(&self, agent: &str) -> Outcome {
        let changes = {
            let mut state = self.state.write().await;
            let toggled = favorites::toggle_agent(&mut state.favorites, agent);
            let propagated = state.propagate_favorites(self.settings.favorites_scope);
            vec![toggled, propagated]
        };
        self.commit_favorites(changes).await
    }

    /// Send agent keys to the server and cache folder keys locally.
    pub async fn persist_favorites(&self) -> RemoteResult<()> {
        let (agents, folders) = {
            let state = self.state.read().await;
            (state.favorites.agents(), state.favorites.folders())
        };
        self.timed(self.remote.save_selection(&agents)).await?;
        self.store_folder_keys(&folders).await;
        debug!(agents = agents.len(), folders = folders.len(), "Favorites persisted");
        Ok(())
    }

    async fn commit_favorites(&self, changes: Vec<FavoritesChange>) -> Outcome {
        if changes.iter().all(FavoritesChange::is_empty) {
            return Outcome::Ignored;
        }
        {
            let state = self.state.read().await;
            self.paint(&state);
        }

        match self.persist_favorites().await {
            Ok(()) => Outcome::Applied,
            Err(err) => {
                warn!(error = %err, "Favorites not saved, reverting");
                let mut state = self.state.write().await;
                for change in changes.iter().rev() {
                    state.favorites.revert(change);
                }
                self.paint(&state);
                drop(state);
                self.toast(FAVORITES_FAILED, ToastKind::Error);
                Outcome::Failed(err.server_message())
            }
        }
    }
}
