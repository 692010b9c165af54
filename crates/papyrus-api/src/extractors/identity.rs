//! `CurrentUser` extractor: resolves the forwarded identity header into a
//! request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use papyrus_core::error::AppError;
use papyrus_core::types::UserId;
use papyrus_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's user id, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved caller, available in handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl std::ops::Deref for CurrentUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing X-User-Id header"))?;

        let user_id: UserId = raw
            .trim()
            .parse()
            .map_err(|_| AppError::authentication("Invalid X-User-Id header"))?;

        let user = state.user_service.resolve(user_id).await?;
        Ok(CurrentUser(RequestContext::new(user)))
    }
}
