//! Favorites set, folder-favorite propagation and cascading toggles.
//!
//! Folder keys are derived: a folder with at least one member agent is a
//! favorite exactly when all its members are.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use papyrus_core::config::FavoritesScope;
use papyrus_entity::favorite::FavoriteKey;
use papyrus_entity::folder::{FolderId, FolderStructure};

/// Agent and folder keys the user starred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesSet(BTreeSet<FavoriteKey>);

/// Keys added and removed by one operation, so it can be undone exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesChange {
    /// Keys that were inserted.
    pub added: Vec<FavoriteKey>,
    /// Keys that were removed.
    pub removed: Vec<FavoriteKey>,
}

impl FavoritesChange {
    /// Whether the operation changed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl FavoritesSet {
    /// Set built from a server selection.
    pub fn from_selection(names: impl IntoIterator<Item = String>) -> Self {
        Self(names.into_iter().map(FavoriteKey::from).collect())
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &FavoriteKey) -> bool {
        self.0.contains(key)
    }

    /// Whether an agent is a favorite.
    pub fn has_agent(&self, agent: &str) -> bool {
        self.0.contains(&FavoriteKey::agent(agent))
    }

    /// Whether a folder key is present.
    pub fn has_folder(&self, id: &FolderId) -> bool {
        self.0.contains(&FavoriteKey::folder(id))
    }

    /// Insert a key, returning whether it was new.
    pub fn insert(&mut self, key: FavoriteKey) -> bool {
        self.0.insert(key)
    }

    /// Remove a key, returning whether it was present.
    pub fn remove(&mut self, key: &FavoriteKey) -> bool {
        self.0.remove(key)
    }

    /// Agent names, in order. This is what the server stores.
    pub fn agents(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|k| k.as_agent().map(str::to_string))
            .collect()
    }

    /// Folder ids carrying a key.
    pub fn folders(&self) -> Vec<FolderId> {
        self.0
            .iter()
            .filter_map(|k| match k {
                FavoriteKey::Folder(id) => Some(id.clone()),
                FavoriteKey::Agent(_) => None,
            })
            .collect()
    }

    /// Add folder keys restored from the local cache.
    pub fn merge_folders(&mut self, folders: impl IntoIterator<Item = FolderId>) {
        self.0.extend(folders.into_iter().map(FavoriteKey::Folder));
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Undo a recorded change.
    pub fn revert(&mut self, change: &FavoritesChange) {
        for key in &change.added {
            self.0.remove(key);
        }
        for key in &change.removed {
            self.0.insert(key.clone());
        }
    }

    fn record_insert(&mut self, key: FavoriteKey, change: &mut FavoritesChange) {
        if self.0.insert(key.clone()) {
            change.added.push(key);
        }
    }

    fn record_remove(&mut self, key: FavoriteKey, change: &mut FavoritesChange) {
        if self.0.remove(&key) {
            change.removed.push(key);
        }
    }
}

/// Recompute every folder key from its member agents.
///
/// Folders without members keep whatever key they have.
pub fn auto_mark_folder_favorites(
    favorites: &mut FavoritesSet,
    structure: &FolderStructure,
    scope: FavoritesScope,
) -> FavoritesChange {
    let mut change = FavoritesChange::default();
    for id in structure.folders.keys() {
        let members = structure.agents_in(id, scope);
        if members.is_empty() {
            continue;
        }
        let all_favorite = members.iter().all(|agent| favorites.has_agent(agent));
        if all_favorite {
            favorites.record_insert(FavoriteKey::folder(id), &mut change);
        } else {
            favorites.record_remove(FavoriteKey::folder(id), &mut change);
        }
    }
    change
}

/// Star or unstar a folder together with every agent reachable from it.
pub fn toggle_folder(
    favorites: &mut FavoritesSet,
    structure: &FolderStructure,
    id: &FolderId,
) -> FavoritesChange {
    let mut change = FavoritesChange::default();
    let agents = structure.agents_in(id, FavoritesScope::Recursive);
    if favorites.has_folder(id) {
        favorites.record_remove(FavoriteKey::folder(id), &mut change);
        for agent in agents {
            favorites.record_remove(FavoriteKey::agent(agent), &mut change);
        }
    } else {
        favorites.record_insert(FavoriteKey::folder(id), &mut change);
        for agent in agents {
            favorites.record_insert(FavoriteKey::agent(agent), &mut change);
        }
    }
    change
}

/// Star or unstar one agent.
pub fn toggle_agent(favorites: &mut FavoritesSet, agent: &str) -> FavoritesChange {
    let mut change = FavoritesChange::default();
    let key = FavoriteKey::agent(agent);
    if favorites.contains(&key) {
        favorites.record_remove(key, &mut change);
    } else {
        favorites.record_insert(key, &mut change);
    }
    change
}

/// Whether a folder is starred or holds a starred agent anywhere below it.
pub fn folder_has_favorite(
    favorites: &FavoritesSet,
    structure: &FolderStructure,
    id: &FolderId,
) -> bool {
    favorites.has_folder(id)
        || structure
            .agents_in(id, FavoritesScope::Recursive)
            .iter()
            .any(|agent| favorites.has_agent(agent))
}
