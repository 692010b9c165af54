//! User context and onboarding handlers.

use axum::Json;
use axum::extract::State;

use papyrus_entity::onboarding::OnboardingProfile;

use crate::dto::response::UserContextResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/user-context
pub async fn user_context(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<UserContextResponse> {
    Json(UserContextResponse {
        success: true,
        context: state.user_service.context(&user),
    })
}

/// POST /api/save-onboarding-data
pub async fn save_onboarding(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(profile): Json<OnboardingProfile>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.user_service.save_onboarding(&user, profile).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/onboarding-data
pub async fn get_onboarding(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile = state.user_service.onboarding(&user).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": profile })))
}
