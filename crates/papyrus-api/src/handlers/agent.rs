//! Agent catalog handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};

use crate::dto::request::{
    UpsertAgentRequest, VersionedDeleteRequest, parse_optional_body, validate_body,
};
use crate::dto::response::VersionResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/etiquetas-context
pub async fn list_agents(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = state.agent_service.list(&user).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": catalog })))
}

/// POST /api/etiquetas
pub async fn upsert_agent(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpsertAgentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_body(&req)?;
    state
        .agent_service
        .upsert(&user, &req.nombre, req.descripcion)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/etiquetas/{name}
pub async fn delete_agent(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<VersionResponse>, ApiError> {
    let req: VersionedDeleteRequest = parse_optional_body(&body)?;
    let new_version = state
        .agent_service
        .delete(&user, &name, req.expected_version)
        .await?;
    Ok(Json(VersionResponse::committed(new_version)))
}
