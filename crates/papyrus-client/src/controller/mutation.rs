//! Structural mutations: agent moves, drops, folder edits and agent
//! deletion.

use tracing::{debug, info, warn};

use papyrus_entity::folder::FolderId;

use super::{
    AGENT_DELETED, CREATE_DENIED, CREATE_FAILED, DELETE_FAILED, FolderController, MOVE_DENIED,
    MOVE_FAILED, MOVE_OK, OPERATION_FAILED, Outcome, RENAME_FAILED,
};
use crate::drag::DragPayload;
use crate::host::ToastKind;

impl FolderController {
    /// Move an agent into `target`, or to the root for `None`.
    ///
    /// The mirror changes before the remote call. On success it is replaced
    /// by a fresh server copy; on failure the previous assignment is put
    /// back exactly.
    pub async fn move_agent_to(&self, agent: &str, target: Option<FolderId>) -> Outcome {
        if !self.state.read().await.user.can_drag() {
            return Outcome::Denied(MOVE_DENIED);
        }
        let Some(_guard) = self.try_begin() else {
            debug!(agent, "Mutation in flight, agent move ignored");
            return Outcome::Ignored;
        };

        let (pending, expected) = {
            let mut state = self.state.write().await;
            if let Some(folder) = &target {
                if !state.structure.contains(folder) {
                    debug!(agent, folder = %folder, "Drop target no longer exists");
                    return Outcome::Ignored;
                }
            }
            if state.structure.assignment(agent) == target.as_ref() {
                return Outcome::Ignored;
            }
            let expected = state.version();
            let pending = state.apply_move(agent, target.clone());
            self.host.remove_agent_card(agent);
            self.paint(&state);
            (pending, expected)
        };

        let result = self
            .timed(self.remote.assign_agent(agent, target.as_ref(), expected))
            .await;

        match result {
            Ok(_) => {
                self.reconcile_structure().await;
                info!(agent, "Agent moved");
                self.toast(MOVE_OK, ToastKind::Success);
                Outcome::Applied
            }
            Err(err) => {
                {
                    let mut state = self.state.write().await;
                    state.revert(pending);
                    self.paint(&state);
                }
                self.failure(err, MOVE_FAILED)
            }
        }
    }

    /// Handle a drop onto a folder node.
    pub async fn on_drop_into_folder(&self, folder: &FolderId, payload: &str) -> Outcome {
        match DragPayload::parse(payload) {
            Some(DragPayload::Agent { agente }) => {
                self.move_agent_to(&agente, Some(folder.clone())).await
            }
            Some(DragPayload::Folder { folder_id }) if &folder_id == folder => Outcome::Ignored,
            Some(DragPayload::Folder { folder_id }) => self.move_folder(&folder_id, Some(folder)).await,
            None => {
                debug!(payload, "Malformed drag payload ignored");
                Outcome::Ignored
            }
        }
    }

    /// Handle a drop onto the root zone.
    pub async fn on_drop_into_root(&self, payload: &str) -> Outcome {
        match DragPayload::parse(payload) {
            Some(DragPayload::Agent { agente }) => self.move_agent_to(&agente, None).await,
            Some(DragPayload::Folder { folder_id }) => self.move_folder(&folder_id, None).await,
            None => {
                debug!(payload, "Malformed drag payload ignored");
                Outcome::Ignored
            }
        }
    }

    /// Re-parent a folder, then reload.
    pub async fn move_folder(&self, id: &FolderId, new_parent: Option<&FolderId>) -> Outcome {
        let expected = {
            let state = self.state.read().await;
            if !state.user.can_drag() {
                return Outcome::Denied(MOVE_DENIED);
            }
            let Some(folder) = state.structure.folder(id) else {
                return Outcome::Ignored;
            };
            if folder.parent_id.as_ref() == new_parent {
                return Outcome::Ignored;
            }
            state.version()
        };
        let Some(_guard) = self.try_begin() else {
            debug!(folder = %id, "Mutation in flight, folder move ignored");
            return Outcome::Ignored;
        };

        match self
            .timed(self.remote.move_folder(id, new_parent, expected))
            .await
        {
            Ok(_) => {
                self.reload().await;
                Outcome::Applied
            }
            Err(err) => self.failure(err, OPERATION_FAILED),
        }
    }

    /// Create a folder under the current folder, then reload.
    pub async fn create_folder(&self, nombre: &str) -> Outcome {
        let nombre = nombre.trim();
        let (parent, expected) = {
            let state = self.state.read().await;
            if !state.user.can_create_folder() {
                return Outcome::Denied(CREATE_DENIED);
            }
            (state.current_folder.clone(), state.version())
        };
        if nombre.is_empty() {
            return Outcome::Ignored;
        }
        let Some(_guard) = self.try_begin() else {
            return Outcome::Ignored;
        };

        match self
            .timed(self.remote.create_folder(nombre, parent.as_ref(), expected))
            .await
        {
            Ok(ack) => {
                info!(nombre, folder_id = ?ack.folder_id, "Folder created");
                self.reload().await;
                Outcome::Applied
            }
            Err(err) => self.failure(err, CREATE_FAILED),
        }
    }

    /// Rename a folder, then reload. An unchanged name is a no-op.
    pub async fn rename_folder(&self, id: &FolderId, new_name: &str) -> Outcome {
        let new_name = new_name.trim();
        let expected = {
            let state = self.state.read().await;
            if !state.user.can_drag() {
                return Outcome::Denied(MOVE_DENIED);
            }
            let Some(folder) = state.structure.folder(id) else {
                return Outcome::Ignored;
            };
            if new_name.is_empty() || folder.nombre.trim() == new_name {
                return Outcome::Ignored;
            }
            state.version()
        };
        let Some(_guard) = self.try_begin() else {
            return Outcome::Ignored;
        };

        match self
            .timed(self.remote.rename_folder(id, new_name, expected))
            .await
        {
            Ok(_) => {
                self.reload().await;
                Outcome::Applied
            }
            Err(err) => self.failure(err, RENAME_FAILED),
        }
    }

    /// Delete a folder, then reload. Emptiness is checked by the server.
    pub async fn delete_folder(&self, id: &FolderId) -> Outcome {
        let expected = {
            let state = self.state.read().await;
            if !state.user.can_drag() {
                return Outcome::Denied(MOVE_DENIED);
            }
            if !state.structure.contains(id) {
                return Outcome::Ignored;
            }
            state.version()
        };
        let Some(_guard) = self.try_begin() else {
            return Outcome::Ignored;
        };

        match self.timed(self.remote.delete_folder(id, expected)).await {
            Ok(_) => {
                self.reload().await;
                Outcome::Applied
            }
            Err(err) => self.failure(err, DELETE_FAILED),
        }
    }

    /// Delete an agent from the catalog.
    ///
    /// The card disappears right away; any failure reloads to restore it.
    pub async fn delete_agent(&self, name: &str) -> Outcome {
        if !self.state.read().await.user.can_drag() {
            return Outcome::Denied(MOVE_DENIED);
        }
        let Some(_guard) = self.try_begin() else {
            return Outcome::Ignored;
        };

        let expected = {
            let mut state = self.state.write().await;
            let expected = state.version();
            state.apply_removal(name);
            state.catalog.remove(name);
            self.host.remove_agent_card(name);
            self.paint(&state);
            expected
        };

        let result = self.timed(self.remote.delete_agent(name, expected)).await;
        self.reload().await;
        match result {
            Ok(_) => {
                info!(agent = name, "Agent deleted");
                self.toast(AGENT_DELETED, ToastKind::Success);
                Outcome::Applied
            }
            Err(err) => self.failure(err, DELETE_FAILED),
        }
    }

    /// Replace the structure with the server copy after a confirmed move.
    async fn reconcile_structure(&self) {
        match self.timed(self.remote.folder_context()).await {
            Ok(structure) => {
                let mut state = self.state.write().await;
                state.replace_structure(structure);
                state.propagate_favorites(self.settings.favorites_scope);
                self.paint(&state);
            }
            Err(e) => {
                warn!(error = %e, "Reconcile fetch failed, keeping local state until next reload");
            }
        }
    }
}
