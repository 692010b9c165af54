//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use papyrus_core::config::{DatabaseConfig, StoreConfig};
use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_entity::history::HistoryEntry;
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserAccount;

use super::{MemoryWorkspaceStore, PgWorkspaceStore, StructureCommit, WorkspaceDocument, WorkspaceStore};
use crate::connection::DatabasePool;
use crate::migration::run_migrations;

/// Wraps the workspace store selected at startup.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn WorkspaceStore>,
}

impl StoreManager {
    /// Create the store named by `store.provider`.
    pub async fn new(store: &StoreConfig, database: &DatabaseConfig) -> AppResult<Self> {
        let inner: Arc<dyn WorkspaceStore> = match store.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL workspace store");
                let pool = DatabasePool::connect(database).await?.into_pool();
                if store.run_migrations {
                    run_migrations(&pool).await?;
                }
                Arc::new(PgWorkspaceStore::new(pool))
            }
            "memory" => {
                info!("Initializing in-memory workspace store");
                Arc::new(MemoryWorkspaceStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl WorkspaceStore for StoreManager {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        self.inner.find_user(id).await
    }

    async fn upsert_user(&self, user: &UserAccount) -> AppResult<()> {
        self.inner.upsert_user(user).await
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        self.inner.list_users().await
    }

    async fn load_workspace(&self, id: WorkspaceId) -> AppResult<WorkspaceDocument> {
        self.inner.load_workspace(id).await
    }

    async fn commit_structure(&self, commit: StructureCommit) -> AppResult<bool> {
        self.inner.commit_structure(commit).await
    }

    async fn upsert_agent(
        &self,
        id: WorkspaceId,
        name: &str,
        description: &serde_json::Value,
    ) -> AppResult<()> {
        self.inner.upsert_agent(id, name, description).await
    }

    async fn load_selection(&self, user: UserId) -> AppResult<Vec<String>> {
        self.inner.load_selection(user).await
    }

    async fn save_selection(&self, user: UserId, selection: &[String]) -> AppResult<()> {
        self.inner.save_selection(user, selection).await
    }

    async fn save_onboarding(&self, user: UserId, profile: &OnboardingProfile) -> AppResult<()> {
        self.inner.save_onboarding(user, profile).await
    }

    async fn load_onboarding(&self, user: UserId) -> AppResult<Option<OnboardingProfile>> {
        self.inner.load_onboarding(user).await
    }

    async fn history(&self, id: WorkspaceId, limit: usize) -> AppResult<Vec<HistoryEntry>> {
        self.inner.history(id, limit).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
