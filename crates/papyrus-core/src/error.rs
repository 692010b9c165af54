//! The error type shared by the store, services, API and CLI.
//!
//! Everything below the HTTP layer returns [`AppError`]; the API maps its
//! [`ErrorKind`] to a status code and, for version conflicts, adds the
//! stored version to the response body.

use std::fmt;

use thiserror::Error;

/// What went wrong, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Folder, agent or account does not exist.
    NotFound,
    /// No usable identity on the request.
    Authentication,
    /// Identity lacks the permission for this action.
    Authorization,
    /// Request rejected by a structure or input rule.
    Validation,
    /// Stale `expectedVersion` or a lost compare-and-swap.
    Conflict,
    /// Bug or invariant breach.
    Internal,
    /// Postgres failure.
    Database,
    /// Local file failure (client state, taxonomy).
    Storage,
    /// Bad or missing settings.
    Configuration,
    /// Malformed JSON.
    Serialization,
    /// A dependency is down; retrying may help.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Upper snake case name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Storage => "STORAGE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error with its kind, a user-facing message and an optional cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category, decides the HTTP status.
    pub kind: ErrorKind,
    /// Message shown to the user as-is.
    pub message: String,
    /// Version the store holds, set only for version conflicts.
    pub current_version: Option<u64>,
    /// Underlying cause, logged but never sent to clients.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Error of `kind` with no cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            current_version: None,
            source: None,
        }
    }

    /// Error of `kind` wrapping `source`.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    /// [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// [`ErrorKind::Authentication`].
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// [`ErrorKind::Authorization`].
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// [`ErrorKind::Conflict`] without a version.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// The caller's `expectedVersion` is behind `current_version`.
    pub fn version_conflict(current_version: u64) -> Self {
        Self {
            current_version: Some(current_version),
            ..Self::conflict("Conflicto de versión")
        }
    }

    /// [`ErrorKind::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// [`ErrorKind::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether a client should reload before retrying.
    pub fn is_version_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict && self.current_version.is_some()
    }
}

// The boxed source is not `Clone`; copies keep everything else.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            current_version: self.current_version,
            ..Self::new(self.kind, self.message.clone())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("JSON inválido: {err}"), err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, format!("Invalid configuration: {err}"), err)
    }
}
