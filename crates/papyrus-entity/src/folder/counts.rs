//! Recursive agent counts per folder.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::model::FolderId;
use super::structure::FolderStructure;

/// Number of agents in each folder's subtree plus the unfiled totals.
///
/// Serialized flat: `{ "<folderId>": n, "root": n, "root_total": n }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCounts {
    /// Agents assigned to no folder (or to a folder that no longer exists).
    pub root: usize,
    /// `root` plus every top-level folder's subtree count.
    pub root_total: usize,
    /// Subtree count per folder.
    #[serde(flatten)]
    pub folders: BTreeMap<FolderId, usize>,
}

impl FolderCounts {
    /// Compute counts for a structure.
    ///
    /// Folders that sit on a parent cycle are counted once each and are not
    /// reachable from the top level.
    pub fn compute(structure: &FolderStructure) -> Self {
        let mut direct: BTreeMap<&FolderId, usize> = BTreeMap::new();
        let mut root = 0;
        for agent in structure.asignaciones.keys() {
            match structure.assignment(agent) {
                Some(fid) => *direct.entry(fid).or_default() += 1,
                None => root += 1,
            }
        }

        let mut counts = Self {
            root,
            ..Self::default()
        };
        let mut visited = HashSet::new();
        let mut root_total = root;
        for top in structure.children(None) {
            root_total += counts.fill(structure, &top.id, &direct, &mut visited);
        }
        for id in structure.folders.keys() {
            if !visited.contains(id) {
                counts.fill(structure, id, &direct, &mut visited);
            }
        }
        counts.root_total = root_total;
        counts
    }

    fn fill(
        &mut self,
        structure: &FolderStructure,
        id: &FolderId,
        direct: &BTreeMap<&FolderId, usize>,
        visited: &mut HashSet<FolderId>,
    ) -> usize {
        if !visited.insert(id.clone()) {
            return 0;
        }
        let mut total = direct.get(id).copied().unwrap_or(0);
        for child in structure.children(Some(id)) {
            total += self.fill(structure, &child.id, direct, visited);
        }
        self.folders.insert(id.clone(), total);
        total
    }

    /// Subtree count for a folder, zero when unknown.
    pub fn get(&self, id: &FolderId) -> usize {
        self.folders.get(id).copied().unwrap_or(0)
    }
}
