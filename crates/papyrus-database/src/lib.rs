//! # papyrus-database
//!
//! Persistence for folder workspaces. The [`store::WorkspaceStore`] trait
//! is implemented by a PostgreSQL backend (built from the repositories in
//! [`repositories`]) and by an in-process backend used for tests and local
//! runs. [`StoreManager`] picks one from configuration.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{StoreManager, StructureCommit, WorkspaceDocument, WorkspaceStore};
