//! PostgreSQL-backed workspace store.

use async_trait::async_trait;
use sqlx::PgPool;

use papyrus_core::error::{AppError, ErrorKind};
use papyrus_core::result::AppResult;
use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_entity::history::HistoryEntry;
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserAccount;

use super::{StructureCommit, WorkspaceDocument, WorkspaceStore};
use crate::repositories::{HistoryRepository, UserRepository, WorkspaceRepository};

/// Workspace store composed from the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgWorkspaceStore {
    pool: PgPool,
    users: UserRepository,
    workspaces: WorkspaceRepository,
    history: HistoryRepository,
}

impl PgWorkspaceStore {
    /// Build the store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            workspaces: WorkspaceRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl WorkspaceStore for PgWorkspaceStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        self.users.find_by_id(id).await
    }

    async fn upsert_user(&self, user: &UserAccount) -> AppResult<()> {
        self.users.upsert(user).await
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        self.users.list().await
    }

    async fn load_workspace(&self, id: WorkspaceId) -> AppResult<WorkspaceDocument> {
        self.workspaces.find(id).await
    }

    async fn commit_structure(&self, commit: StructureCommit) -> AppResult<bool> {
        self.workspaces.commit(&commit).await
    }

    async fn upsert_agent(
        &self,
        id: WorkspaceId,
        name: &str,
        description: &serde_json::Value,
    ) -> AppResult<()> {
        self.workspaces.upsert_agent(id, name, description).await
    }

    async fn load_selection(&self, user: UserId) -> AppResult<Vec<String>> {
        self.users.find_selection(user).await
    }

    async fn save_selection(&self, user: UserId, selection: &[String]) -> AppResult<()> {
        self.users.update_selection(user, selection).await
    }

    async fn save_onboarding(&self, user: UserId, profile: &OnboardingProfile) -> AppResult<()> {
        self.users.update_onboarding(user, profile).await
    }

    async fn load_onboarding(&self, user: UserId) -> AppResult<Option<OnboardingProfile>> {
        self.users.find_onboarding(user).await
    }

    async fn history(&self, id: WorkspaceId, limit: usize) -> AppResult<Vec<HistoryEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.history.find_recent(id, limit).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
