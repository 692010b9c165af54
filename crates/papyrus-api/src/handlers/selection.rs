//! Favorite selection handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::SelectionRequest;
use crate::dto::response::SelectionResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/agentes-seleccion-personalizada
pub async fn get_selection(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SelectionResponse>, ApiError> {
    let seleccion = state.selection_service.get(&user).await?;
    Ok(Json(SelectionResponse {
        success: true,
        seleccion,
    }))
}

/// POST /api/agentes-seleccion-personalizada
pub async fn save_selection(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.selection_service.update(&user, req.seleccion).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
