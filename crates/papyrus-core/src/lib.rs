//! # papyrus-core
//!
//! Core crate for Papyrus. Contains configuration schemas, typed
//! identifiers and the unified error system shared by the server, the
//! client subsystem and the CLI.
//!
//! This crate has **no** internal dependencies on other Papyrus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
