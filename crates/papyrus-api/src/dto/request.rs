//! Request DTOs with validation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use papyrus_core::error::AppError;
use papyrus_entity::folder::FolderId;

/// POST /api/carpetas
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 200, message = "El nombre de la carpeta es obligatorio"))]
    pub nombre: String,
    /// Parent folder.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Version the client last saw.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// PUT /api/carpetas/{id}/rename
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameFolderRequest {
    /// New folder name.
    #[validate(length(min = 1, max = 200, message = "El nombre de la carpeta es obligatorio"))]
    pub new_name: String,
    /// Version the client last saw.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// PUT /api/carpetas/{id}/move
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    /// New parent; `null` moves the folder to the top level.
    #[serde(default)]
    pub new_parent_id: Option<FolderId>,
    /// Version the client last saw.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Body of versioned DELETE requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedDeleteRequest {
    /// Version the client last saw.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// POST /api/carpetas/assign
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignAgentRequest {
    /// Agent being moved.
    #[validate(length(min = 1, message = "El nombre del agente es obligatorio"))]
    pub agente_name: String,
    /// Target folder; `null` means root.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Version the client last saw.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// POST /api/agentes-seleccion-personalizada
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Favorite agent names.
    #[serde(default)]
    pub seleccion: Vec<String>,
}

/// POST /api/etiquetas
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertAgentRequest {
    /// Agent name.
    #[validate(length(min = 1, max = 200, message = "El nombre del agente es obligatorio"))]
    pub nombre: String,
    /// Free-form description.
    #[serde(default)]
    pub descripcion: serde_json::Value,
}

/// Run `validator` rules and map failures to a validation error.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| format!("Invalid request: {errors}"));
        AppError::validation(message)
    })
}

/// Parse an optional JSON body; an empty body yields the default.
pub fn parse_optional_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))
}
