//! Tree view and agent moves.

use clap::Args;
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use papyrus_client::render::{paint_tree, render_grid, render_tree};
use papyrus_core::error::AppError;
use papyrus_entity::folder::FolderId;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Folder to open; the root when omitted
    pub folder: Option<String>,

    /// Show only starred folders and agents
    #[arg(long)]
    pub favorites: bool,
}

/// Arguments for the mv command
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Agent name
    pub agent: String,

    /// Target folder id; the root when omitted
    pub folder: Option<String>,
}

/// Agent display row for table output
#[derive(Debug, Serialize, Tabled)]
struct AgentRow {
    #[tabled(rename = "Agente")]
    agente: String,
    #[tabled(rename = "Fav")]
    favorito: String,
    #[tabled(rename = "Descripción")]
    descripcion: String,
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, session: &Session<'_>) -> Result<(), AppError> {
    let controller = session.controller().await?;
    controller.set_favorites_only(args.favorites).await;
    if let Some(folder) = &args.folder {
        controller.enter_folder(Some(FolderId::from(folder.as_str()))).await;
    }

    let state = controller.snapshot().await;
    let tree = render_tree(&state);
    let grid = render_grid(&state);

    match session.format {
        OutputFormat::Json => output::print_json(&json!({
            "version": state.version(),
            "tree": tree,
            "agents": grid,
        })),
        OutputFormat::Table => {
            print!("{}", paint_tree(&tree));
            output::print_kv("Versión", &state.version().to_string());
            let rows: Vec<AgentRow> = grid
                .cards
                .iter()
                .map(|card| AgentRow {
                    agente: card.nombre.clone(),
                    favorito: if card.favorite { "★" } else { "" }.to_string(),
                    descripcion: describe(&card.descripcion),
                })
                .collect();
            output::print_list(&rows, OutputFormat::Table);
        }
    }
    Ok(())
}

/// Execute the mv command
pub async fn execute_move(args: &MoveArgs, session: &Session<'_>) -> Result<(), AppError> {
    let controller = session.controller().await?;
    let target = args.folder.as_deref().map(FolderId::from);
    super::report(controller.move_agent_to(&args.agent, target).await)
}

fn describe(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    if text.chars().count() > 60 {
        let cut: String = text.chars().take(57).collect();
        format!("{cut}...")
    } else {
        text
    }
}
