//! Route definitions for the Papyrus HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(agent_routes())
        .merge(selection_routes())
        .merge(user_routes())
        .merge(health_routes());

    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder structure, assignment and history
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/carpetas-context", get(handlers::folder::get_context))
        .route("/carpetas", post(handlers::folder::create_folder))
        .route("/carpetas/assign", post(handlers::folder::assign_agent))
        .route("/carpetas/historial", get(handlers::folder::history))
        .route("/carpetas/{id}", delete(handlers::folder::delete_folder))
        .route("/carpetas/{id}/rename", put(handlers::folder::rename_folder))
        .route("/carpetas/{id}/move", put(handlers::folder::move_folder))
}

/// Agent catalog
fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/etiquetas-context", get(handlers::agent::list_agents))
        .route("/etiquetas", post(handlers::agent::upsert_agent))
        .route("/etiquetas/{name}", delete(handlers::agent::delete_agent))
}

/// Favorite selection
fn selection_routes() -> Router<AppState> {
    Router::new().route(
        "/agentes-seleccion-personalizada",
        get(handlers::selection::get_selection).post(handlers::selection::save_selection),
    )
}

/// User context and onboarding
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user-context", get(handlers::user::user_context))
        .route("/save-onboarding-data", post(handlers::user::save_onboarding))
        .route("/onboarding-data", get(handlers::user::get_onboarding))
}

/// Health check (no identity required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
