//! # papyrus-service
//!
//! Business logic service layer for Papyrus. Services validate requests
//! against the caller's permissions and the current folder structure, then
//! commit through the workspace store with optimistic concurrency.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod agent;
mod commit;
pub mod context;
pub mod folder;
pub mod selection;
pub mod user;

pub use agent::AgentService;
pub use context::RequestContext;
pub use folder::FolderService;
pub use selection::SelectionService;
pub use user::UserService;

#[cfg(test)]
mod testing;
