//! # papyrus-api
//!
//! HTTP API layer for the Papyrus folder store built on Axum.
//!
//! Provides the folder, agent, selection, user-context and onboarding
//! endpoints, the identity extractor, middleware, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
