//! Folder structure, assignment and history handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use papyrus_entity::folder::FolderId;
use papyrus_service::folder::CreateFolderRequest as SvcCreateFolder;

use crate::dto::request::{
    AssignAgentRequest, CreateFolderRequest, MoveFolderRequest, RenameFolderRequest,
    VersionedDeleteRequest, parse_optional_body, validate_body,
};
use crate::dto::response::{FolderContextResponse, VersionResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Default number of history entries returned.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// GET /api/carpetas-context
pub async fn get_context(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<FolderContextResponse>, ApiError> {
    let context = state.folder_service.context(&user).await?;
    Ok(Json(FolderContextResponse {
        success: true,
        data: context.structure,
        counts: context.counts,
        source: context.source.to_string(),
    }))
}

/// POST /api/carpetas
pub async fn create_folder(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<VersionResponse>, ApiError> {
    validate_body(&req)?;
    let (folder_id, new_version) = state
        .folder_service
        .create_folder(
            &user,
            SvcCreateFolder {
                nombre: req.nombre,
                parent_id: req.parent_id,
                expected_version: req.expected_version,
            },
        )
        .await?;

    Ok(Json(VersionResponse {
        folder_id: Some(folder_id),
        ..VersionResponse::committed(new_version)
    }))
}

/// PUT /api/carpetas/{id}/rename
pub async fn rename_folder(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<FolderId>,
    Json(req): Json<RenameFolderRequest>,
) -> Result<Json<VersionResponse>, ApiError> {
    validate_body(&req)?;
    let new_version = state
        .folder_service
        .rename_folder(&user, &id, &req.new_name, req.expected_version)
        .await?;
    Ok(Json(VersionResponse::committed(new_version)))
}

/// PUT /api/carpetas/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<FolderId>,
    Json(req): Json<MoveFolderRequest>,
) -> Result<Json<VersionResponse>, ApiError> {
    let new_version = state
        .folder_service
        .move_folder(&user, &id, req.new_parent_id.as_ref(), req.expected_version)
        .await?;
    Ok(Json(VersionResponse::committed(new_version)))
}

/// DELETE /api/carpetas/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<FolderId>,
    body: Bytes,
) -> Result<Json<VersionResponse>, ApiError> {
    let req: VersionedDeleteRequest = parse_optional_body(&body)?;
    let new_version = state
        .folder_service
        .delete_folder(&user, &id, req.expected_version)
        .await?;
    Ok(Json(VersionResponse::committed(new_version)))
}

/// POST /api/carpetas/assign
pub async fn assign_agent(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AssignAgentRequest>,
) -> Result<Json<VersionResponse>, ApiError> {
    validate_body(&req)?;
    let new_version = state
        .folder_service
        .assign_agent(
            &user,
            &req.agente_name,
            req.folder_id.as_ref(),
            req.expected_version,
        )
        .await?;
    Ok(Json(VersionResponse::committed(new_version)))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum entries to return.
    pub limit: Option<usize>,
}

/// GET /api/carpetas/historial
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let entries = state.folder_service.history(&user, limit).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entries })))
}
