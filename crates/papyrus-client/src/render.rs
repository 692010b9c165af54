//! Tree and grid views derived from the client state.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use papyrus_entity::folder::{Folder, FolderId};

use crate::favorites::folder_has_favorite;
use crate::state::ClientState;

/// Label of the root breadcrumb.
pub const ROOT_LABEL: &str = "General";

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    /// Text shown.
    pub label: String,
    /// Folder the crumb opens; `None` is the root.
    pub folder_id: Option<FolderId>,
}

/// A folder in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Folder id.
    pub id: FolderId,
    /// Display name.
    pub nombre: String,
    /// Agents in the subtree.
    pub count: usize,
    /// The folder itself is starred.
    pub favorite: bool,
    /// The folder or something below it is starred.
    pub has_favorite: bool,
    /// Drag handle and folder menu are enabled.
    pub draggable: bool,
    /// Subfolders.
    pub children: Vec<TreeNode>,
}

/// The folder panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView {
    /// `General`, plus the open folder when there is one.
    pub breadcrumb: Vec<Crumb>,
    /// Folders under the cursor.
    pub nodes: Vec<TreeNode>,
    /// Unfiled agents.
    pub root_count: usize,
    /// Every agent in the structure.
    pub root_total: usize,
    /// The "new folder" action is enabled.
    pub can_create_folder: bool,
    /// Favorites-only filter is on.
    pub favorites_only: bool,
}

/// An agent card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCard {
    /// Agent name.
    pub nombre: String,
    /// Catalog description.
    pub descripcion: serde_json::Value,
    /// Starred.
    pub favorite: bool,
    /// Drag handle enabled.
    pub draggable: bool,
}

/// The agent grid at the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    /// Folder being shown; `None` is the root.
    pub folder: Option<FolderId>,
    /// Cards, by name.
    pub cards: Vec<AgentCard>,
}

/// Build the folder panel for the current cursor.
pub fn render_tree(state: &ClientState) -> TreeView {
    let structure = &state.structure;
    let current = state
        .current_folder
        .as_ref()
        .and_then(|id| structure.folder(id));

    let mut breadcrumb = vec![Crumb {
        label: ROOT_LABEL.to_string(),
        folder_id: None,
    }];
    if let Some(folder) = current {
        breadcrumb.push(Crumb {
            label: folder.nombre.clone(),
            folder_id: Some(folder.id.clone()),
        });
    }

    let mut visited = HashSet::new();
    if let Some(folder) = current {
        visited.insert(folder.id.clone());
    }
    let nodes = build_nodes(state, current.map(|f| &f.id), &mut visited);

    TreeView {
        breadcrumb,
        nodes,
        root_count: state.counts.root,
        root_total: state.counts.root_total,
        can_create_folder: state.user.can_create_folder(),
        favorites_only: state.favorites_only,
    }
}

fn build_nodes(
    state: &ClientState,
    parent: Option<&FolderId>,
    visited: &mut HashSet<FolderId>,
) -> Vec<TreeNode> {
    let structure = &state.structure;
    let mut nodes = Vec::new();
    for folder in structure.children(parent) {
        if !visited.insert(folder.id.clone()) {
            continue;
        }
        let node = build_node(state, folder, visited);
        if state.favorites_only && !node.has_favorite {
            continue;
        }
        nodes.push(node);
    }
    nodes
}

fn build_node(state: &ClientState, folder: &Folder, visited: &mut HashSet<FolderId>) -> TreeNode {
    TreeNode {
        id: folder.id.clone(),
        nombre: folder.nombre.clone(),
        count: state.counts.get(&folder.id),
        favorite: state.favorites.has_folder(&folder.id),
        has_favorite: folder_has_favorite(&state.favorites, &state.structure, &folder.id),
        draggable: state.user.can_drag(),
        children: build_nodes(state, Some(&folder.id), visited),
    }
}

/// Build the agent grid for the current cursor.
pub fn render_grid(state: &ClientState) -> GridView {
    let folder = state
        .current_folder
        .clone()
        .filter(|id| state.structure.contains(id));
    let draggable = state.user.can_drag();

    let cards = state
        .agents_at(folder.as_ref())
        .into_iter()
        .filter(|agent| !state.favorites_only || state.favorites.has_agent(agent))
        .map(|agent| AgentCard {
            nombre: agent.to_string(),
            descripcion: state
                .catalog
                .get(agent)
                .cloned()
                .unwrap_or(serde_json::Value::Null),
            favorite: state.favorites.has_agent(agent),
            draggable,
        })
        .collect();

    GridView { folder, cards }
}

/// Plain-text rendering of a tree view.
pub fn paint_tree(view: &TreeView) -> String {
    let mut out = String::new();
    let crumbs: Vec<&str> = view.breadcrumb.iter().map(|c| c.label.as_str()).collect();
    let _ = writeln!(out, "{}", crumbs.join(" / "));
    if view.breadcrumb.len() == 1 {
        let _ = writeln!(out, "  (sin carpeta: {}, total: {})", view.root_count, view.root_total);
    }
    paint_nodes(&mut out, &view.nodes, "");
    out
}

fn paint_nodes(out: &mut String, nodes: &[TreeNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let star = if node.favorite {
            " ★"
        } else if node.has_favorite {
            " ☆"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{prefix}{} {} ({}){star}",
            if last { "└──" } else { "├──" },
            node.nombre,
            node.count,
        );
        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        paint_nodes(out, &node.children, &child_prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papyrus_entity::favorite::FavoriteKey;
    use papyrus_entity::folder::FolderStructure;
    use papyrus_entity::user::{AccountType, Permission, UserContext};

    fn state() -> ClientState {
        let mut s = ClientState::default();
        let mut structure = FolderStructure::default();
        for f in [
            Folder::new("e", "energía", None),
            Folder::new("b", "Banca", None),
            Folder::new("e1", "Renovables", Some("e".into())),
        ] {
            structure.folders.insert(f.id.clone(), f);
        }
        structure.asignaciones.insert("IDAE".into(), Some("e1".into()));
        structure.asignaciones.insert("BdE".into(), Some("b".into()));
        s.catalog.insert("BOE".into(), serde_json::json!("Boletín"));
        s.replace_structure(structure);
        s
    }

    #[test]
    fn test_root_view_nests_children_sorted() {
        let s = state();
        let view = render_tree(&s);
        assert_eq!(view.breadcrumb.len(), 1);
        assert_eq!(view.breadcrumb[0].label, "General");
        let names: Vec<_> = view.nodes.iter().map(|n| n.nombre.as_str()).collect();
        assert_eq!(names, vec!["Banca", "energía"]);
        assert_eq!(view.nodes[1].count, 1);
        assert_eq!(view.nodes[1].children[0].nombre, "Renovables");
    }

    #[test]
    fn test_breadcrumb_shows_only_current_folder() {
        let mut s = state();
        s.enter_folder(Some("e1".into()));
        let view = render_tree(&s);
        let labels: Vec<_> = view.breadcrumb.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["General", "Renovables"]);
        assert!(view.nodes.is_empty());
    }

    #[test]
    fn test_favorites_only_filters_nodes_and_cards() {
        let mut s = state();
        s.favorites.insert(FavoriteKey::agent("IDAE"));
        s.favorites_only = true;
        let view = render_tree(&s);
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.nodes[0].id.as_str(), "e");
        assert!(view.nodes[0].has_favorite);
        assert!(!view.nodes[0].favorite);

        let grid = render_grid(&s);
        assert!(grid.cards.is_empty());
    }

    #[test]
    fn test_draggable_follows_permissions() {
        let mut s = state();
        s.user = UserContext {
            tipo_cuenta: AccountType::Empresa,
            permiso: Some(Permission::Lectura),
            ..UserContext::default()
        };
        let view = render_tree(&s);
        assert!(!view.can_create_folder);
        assert!(view.nodes.iter().all(|n| !n.draggable));
        assert!(render_grid(&s).cards.iter().all(|c| !c.draggable));
    }

    #[test]
    fn test_grid_at_root_lists_unfiled_catalog_agents() {
        let s = state();
        let grid = render_grid(&s);
        assert_eq!(grid.folder, None);
        assert_eq!(grid.cards.len(), 1);
        assert_eq!(grid.cards[0].nombre, "BOE");
        assert_eq!(grid.cards[0].descripcion, serde_json::json!("Boletín"));
    }

    #[test]
    fn test_paint_tree() {
        let s = state();
        let text = paint_tree(&render_tree(&s));
        assert!(text.starts_with("General\n"));
        assert!(text.contains("├── Banca (1)"));
        assert!(text.contains("└── energía (1)"));
        assert!(text.contains("    └── Renovables (1)"));
    }
}
