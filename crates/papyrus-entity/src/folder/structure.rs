//! The versioned folder structure of a workspace.
//!
//! A structure is the unit of optimistic concurrency: every accepted
//! mutation replaces the whole document and bumps `version` by one.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use papyrus_core::config::FavoritesScope;

use super::model::{Folder, FolderId};

/// Agent name to free-form description, as stored in the catalog.
pub type AgentCatalog = BTreeMap<String, serde_json::Value>;

/// Folders, agent assignments and the structure version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderStructure {
    /// Folder nodes keyed by id.
    #[serde(default)]
    pub folders: BTreeMap<FolderId, Folder>,
    /// Agent name to folder; `None` means unfiled.
    #[serde(default)]
    pub asignaciones: BTreeMap<String, Option<FolderId>>,
    /// Monotonic structure version, starting at 1.
    #[serde(default = "default_version")]
    pub version: u64,
}

fn default_version() -> u64 {
    1
}

impl Default for FolderStructure {
    fn default() -> Self {
        Self {
            folders: BTreeMap::new(),
            asignaciones: BTreeMap::new(),
            version: default_version(),
        }
    }
}

impl FolderStructure {
    /// Look up a folder.
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Check whether a folder exists.
    pub fn contains(&self, id: &FolderId) -> bool {
        self.folders.contains_key(id)
    }

    /// The parent a folder is rendered under. A parent that does not exist
    /// is ignored and the folder is treated as top-level.
    pub fn effective_parent<'a>(&'a self, folder: &'a Folder) -> Option<&'a FolderId> {
        folder.parent_id.as_ref().filter(|p| self.folders.contains_key(*p))
    }

    /// Children of `parent` (top-level folders for `None`), sorted by name.
    pub fn children(&self, parent: Option<&FolderId>) -> Vec<&Folder> {
        let mut children: Vec<&Folder> = self
            .folders
            .values()
            .filter(|f| self.effective_parent(f) == parent)
            .collect();
        children.sort_by(|a, b| {
            a.nombre
                .to_lowercase()
                .cmp(&b.nombre.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        children
    }

    /// Whether any folder declares `id` as its parent.
    pub fn has_children(&self, id: &FolderId) -> bool {
        self.folders
            .values()
            .any(|f| f.parent_id.as_ref() == Some(id))
    }

    /// Whether any agent is assigned directly to `id`.
    pub fn has_agents(&self, id: &FolderId) -> bool {
        self.asignaciones
            .values()
            .any(|fid| fid.as_ref() == Some(id))
    }

    /// Folder an agent lives in. Dangling assignments resolve to unfiled.
    pub fn assignment(&self, agent: &str) -> Option<&FolderId> {
        self.asignaciones
            .get(agent)
            .and_then(|fid| fid.as_ref())
            .filter(|fid| self.folders.contains_key(*fid))
    }

    /// Folder ids in the subtree rooted at `id`, including `id` itself.
    pub fn subtree(&self, id: &FolderId) -> HashSet<FolderId> {
        let mut seen = HashSet::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for child in self.children(Some(&current)) {
                stack.push(child.id.clone());
            }
        }
        seen
    }

    /// Agents that belong to a folder under the given membership scope.
    pub fn agents_in(&self, id: &FolderId, scope: FavoritesScope) -> Vec<&str> {
        let members = match scope {
            FavoritesScope::Direct => HashSet::from([id.clone()]),
            FavoritesScope::Recursive => self.subtree(id),
        };
        self.asignaciones
            .keys()
            .filter(|agent| {
                self.assignment(agent)
                    .is_some_and(|fid| members.contains(fid))
            })
            .map(String::as_str)
            .collect()
    }

    /// Agents assigned directly to `folder`, or unfiled agents for `None`.
    pub fn agents_at(&self, folder: Option<&FolderId>) -> Vec<&str> {
        self.asignaciones
            .keys()
            .filter(|agent| self.assignment(agent) == folder)
            .map(String::as_str)
            .collect()
    }

    /// Case-insensitive, whitespace-trimmed sibling name check.
    pub fn is_name_unique_among_siblings(
        &self,
        name: &str,
        parent: Option<&FolderId>,
        exclude: Option<&FolderId>,
    ) -> bool {
        let wanted = name.trim().to_lowercase();
        !self.folders.values().any(|f| {
            f.parent_id.as_ref() == parent
                && Some(&f.id) != exclude
                && f.nombre.trim().to_lowercase() == wanted
        })
    }

    /// Whether re-parenting `folder` under `new_parent` would close a loop.
    pub fn would_create_cycle(&self, folder: &FolderId, new_parent: Option<&FolderId>) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = new_parent.cloned();
        while let Some(current) = cursor {
            if &current == folder {
                return true;
            }
            if !seen.insert(current.clone()) {
                return false;
            }
            cursor = self
                .folders
                .get(&current)
                .and_then(|f| f.parent_id.clone());
        }
        false
    }

    /// Set an agent's folder, returning the previous map entry.
    ///
    /// The outer `Option` of the result tells whether the agent had an
    /// entry at all, so [`FolderStructure::restore_assignment`] can undo
    /// the change exactly.
    pub fn assign(&mut self, agent: &str, target: Option<FolderId>) -> Option<Option<FolderId>> {
        self.asignaciones.insert(agent.to_string(), target)
    }

    /// Put back an entry captured by [`FolderStructure::assign`].
    pub fn restore_assignment(&mut self, agent: &str, previous: Option<Option<FolderId>>) {
        match previous {
            Some(value) => {
                self.asignaciones.insert(agent.to_string(), value);
            }
            None => {
                self.asignaciones.remove(agent);
            }
        }
    }
}
