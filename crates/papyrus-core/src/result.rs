//! Convenience result type alias for Papyrus.

use crate::error::AppError;

/// A specialized `Result` type for Papyrus operations.
pub type AppResult<T> = Result<T, AppError>;
