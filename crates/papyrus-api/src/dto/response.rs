//! Response DTOs.

use serde::{Deserialize, Serialize};

use papyrus_entity::folder::{FolderCounts, FolderId, FolderStructure};
use papyrus_entity::user::UserContext;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// GET /api/carpetas-context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContextResponse {
    /// Always true.
    pub success: bool,
    /// Folders, assignments and version.
    pub data: FolderStructure,
    /// Recursive counts.
    pub counts: FolderCounts,
    /// `empresa` or `user`.
    pub source: String,
}

/// Acknowledges a versioned mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    /// Always true.
    pub success: bool,
    /// Created folder, for POST /api/carpetas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    /// Structure version after the change.
    pub new_version: u64,
}

impl VersionResponse {
    /// Response for a committed change.
    pub fn committed(new_version: u64) -> Self {
        Self {
            success: true,
            folder_id: None,
            new_version,
        }
    }
}

/// Favorite selection payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    /// Always true.
    pub success: bool,
    /// Favorite agent names.
    pub seleccion: Vec<String>,
}

/// GET /api/user-context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContextResponse {
    /// Always true.
    pub success: bool,
    /// Account flags.
    pub context: UserContext,
}
