//! Folder entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque folder identifier.
///
/// The store issues UUIDv7 strings, but ids are compared as plain text so
/// structures written by other producers stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FolderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A folder grouping agents inside a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name.
    pub nombre: String,
    /// Parent folder (`None` for top-level folders).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Manual ordering hint.
    #[serde(default)]
    pub orden: i32,
    /// When the folder was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Who created the folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When the folder was last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Who last changed the folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Folder {
    /// Build a folder with only the structural fields set.
    pub fn new(id: impl Into<FolderId>, nombre: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            parent_id,
            orden: 0,
            created_at: None,
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }

    /// Check if this folder declares no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
