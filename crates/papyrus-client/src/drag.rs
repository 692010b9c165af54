//! Drag payload exchanged through the drag channel as JSON text.

use serde::{Deserialize, Serialize};

use papyrus_entity::folder::FolderId;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DragPayload {
    /// An agent card.
    #[serde(rename = "agente")]
    Agent {
        /// Agent name.
        agente: String,
    },
    /// A folder node.
    #[serde(rename = "folder")]
    Folder {
        /// Folder id.
        #[serde(rename = "folderId")]
        folder_id: FolderId,
    },
}

impl DragPayload {
    /// Parse channel text. Malformed payloads yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text.trim()).ok()
    }

    /// Encode for the drag channel.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
