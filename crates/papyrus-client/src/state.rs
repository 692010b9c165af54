//! The local mirror: the last known server structure plus client-only
//! state, and the pure transitions the controller applies to it.

use std::collections::BTreeSet;

use papyrus_core::config::FavoritesScope;
use papyrus_entity::folder::{AgentCatalog, FolderCounts, FolderId, FolderStructure};
use papyrus_entity::user::UserContext;

use crate::favorites::{self, FavoritesChange, FavoritesSet};

/// Everything the client knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// Permission flags, resolved once at init.
    pub user: UserContext,
    /// Mirror of the server structure.
    pub structure: FolderStructure,
    /// Counts derived from `structure`.
    pub counts: FolderCounts,
    /// Available agents.
    pub catalog: AgentCatalog,
    /// Starred agents and folders.
    pub favorites: FavoritesSet,
    /// Navigation cursor; `None` is the root view.
    pub current_folder: Option<FolderId>,
    /// Show only starred items.
    pub favorites_only: bool,
}

/// An optimistic assignment, kept so it can be undone exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    /// Agent that moved.
    pub agent: String,
    /// Previous map entry; the outer `None` means there was no entry.
    pub previous: Option<Option<FolderId>>,
}

impl ClientState {
    /// Replace the structure wholesale and recompute counts.
    pub fn replace_structure(&mut self, structure: FolderStructure) {
        self.structure = structure;
        self.compute_counts();
        self.ensure_cursor();
    }

    /// Recompute folder counts.
    pub fn compute_counts(&mut self) {
        self.counts = FolderCounts::compute(&self.structure);
    }

    /// Version the next mutation must carry.
    pub fn version(&self) -> u64 {
        self.structure.version
    }

    /// Reset the cursor to root when it points to an unknown folder.
    pub fn ensure_cursor(&mut self) {
        if let Some(id) = &self.current_folder {
            if !self.structure.contains(id) {
                self.current_folder = None;
            }
        }
    }

    /// Open a folder. Unknown ids leave the cursor at root.
    pub fn enter_folder(&mut self, id: Option<FolderId>) {
        self.current_folder = id;
        self.ensure_cursor();
    }

    /// Move the cursor one level up.
    pub fn go_up(&mut self) {
        self.current_folder = self
            .current_folder
            .as_ref()
            .and_then(|id| self.structure.folder(id))
            .and_then(|f| self.structure.effective_parent(f).cloned());
    }

    /// Optimistically move an agent.
    pub fn apply_move(&mut self, agent: &str, target: Option<FolderId>) -> PendingMove {
        let previous = self.structure.assign(agent, target);
        self.compute_counts();
        PendingMove {
            agent: agent.to_string(),
            previous,
        }
    }

    /// Optimistically remove an agent's assignment.
    pub fn apply_removal(&mut self, agent: &str) -> PendingMove {
        let previous = self.structure.asignaciones.remove(agent);
        self.compute_counts();
        PendingMove {
            agent: agent.to_string(),
            previous,
        }
    }

    /// Undo an optimistic move or removal.
    pub fn revert(&mut self, pending: PendingMove) {
        self.structure
            .restore_assignment(&pending.agent, pending.previous);
        self.compute_counts();
    }

    /// All agent names known from the catalog or the assignment map.
    pub fn agent_names(&self) -> BTreeSet<&str> {
        self.catalog
            .keys()
            .chain(self.structure.asignaciones.keys())
            .map(String::as_str)
            .collect()
    }

    /// Agents shown at a cursor position: unfiled ones at root, direct
    /// members inside a folder.
    pub fn agents_at(&self, folder: Option<&FolderId>) -> Vec<&str> {
        self.agent_names()
            .into_iter()
            .filter(|agent| self.structure.assignment(agent) == folder)
            .collect()
    }

    /// Re-derive folder favorites.
    pub fn propagate_favorites(&mut self, scope: FavoritesScope) -> FavoritesChange {
        favorites::auto_mark_folder_favorites(&mut self.favorites, &self.structure, scope)
    }
}
