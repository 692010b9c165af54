//! The workspace store abstraction.

pub mod manager;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use papyrus_core::result::AppResult;
use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_entity::folder::{AgentCatalog, FolderStructure};
use papyrus_entity::history::HistoryEntry;
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserAccount;

pub use manager::StoreManager;
pub use memory::MemoryWorkspaceStore;
pub use postgres::PgWorkspaceStore;

/// Everything stored for one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceDocument {
    /// Versioned folder structure.
    pub structure: FolderStructure,
    /// Agent catalog.
    pub agents: AgentCatalog,
}

/// A new structure to install if the stored version is still `expected_version`.
#[derive(Debug, Clone)]
pub struct StructureCommit {
    /// Target workspace.
    pub workspace_id: WorkspaceId,
    /// Version the caller read before mutating.
    pub expected_version: u64,
    /// The mutated structure, already carrying `expected_version + 1`.
    pub structure: FolderStructure,
    /// Catalog entry removed in the same write.
    pub remove_agent: Option<String>,
    /// Log entry describing the change.
    pub history: HistoryEntry,
}

/// Persistence operations the folder services rely on.
#[async_trait]
pub trait WorkspaceStore: Send + Sync + std::fmt::Debug {
    /// Find an account.
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>>;

    /// Create or replace an account.
    async fn upsert_user(&self, user: &UserAccount) -> AppResult<()>;

    /// All accounts.
    async fn list_users(&self) -> AppResult<Vec<UserAccount>>;

    /// Load a workspace, or an empty one at version 1.
    async fn load_workspace(&self, id: WorkspaceId) -> AppResult<WorkspaceDocument>;

    /// Compare-and-swap the structure. Returns whether the write applied.
    async fn commit_structure(&self, commit: StructureCommit) -> AppResult<bool>;

    /// Insert or replace one agent catalog entry.
    async fn upsert_agent(
        &self,
        id: WorkspaceId,
        name: &str,
        description: &serde_json::Value,
    ) -> AppResult<()>;

    /// Favorite agent selection of a user.
    async fn load_selection(&self, user: UserId) -> AppResult<Vec<String>>;

    /// Replace the favorite agent selection of a user.
    async fn save_selection(&self, user: UserId, selection: &[String]) -> AppResult<()>;

    /// Store the onboarding profile of a user.
    async fn save_onboarding(&self, user: UserId, profile: &OnboardingProfile) -> AppResult<()>;

    /// Load the onboarding profile of a user.
    async fn load_onboarding(&self, user: UserId) -> AppResult<Option<OnboardingProfile>>;

    /// Most recent history entries, newest first.
    async fn history(&self, id: WorkspaceId, limit: usize) -> AppResult<Vec<HistoryEntry>>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}
