//! PostgreSQL repositories backing the workspace store.

pub mod history;
pub mod user;
pub mod workspace;

pub use history::HistoryRepository;
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;
