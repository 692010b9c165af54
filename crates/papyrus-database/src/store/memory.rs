//! In-process workspace store backed by dashmap.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_entity::history::HistoryEntry;
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserAccount;

use super::{StructureCommit, WorkspaceDocument, WorkspaceStore};

#[derive(Debug, Clone, Default)]
struct UserRecord {
    account: Option<UserAccount>,
    selection: Vec<String>,
    onboarding: Option<OnboardingProfile>,
}

/// Workspace store holding everything in memory.
///
/// Commits take the per-workspace shard lock for the compare-and-swap, so
/// concurrent writers observe the same ordering the database backend gives.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkspaceStore {
    users: Arc<DashMap<UserId, UserRecord>>,
    workspaces: Arc<DashMap<WorkspaceId, WorkspaceDocument>>,
    history: Arc<DashMap<WorkspaceId, Vec<HistoryEntry>>>,
}

impl MemoryWorkspaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn require_user(&self, id: UserId) -> AppResult<dashmap::mapref::one::RefMut<'_, UserId, UserRecord>> {
        match self.users.get_mut(&id) {
            Some(record) if record.account.is_some() => Ok(record),
            _ => Err(AppError::not_found(format!("User {id} not found"))),
        }
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.get(&id).and_then(|r| r.account.clone()))
    }

    async fn upsert_user(&self, user: &UserAccount) -> AppResult<()> {
        self.users.entry(user.id).or_default().account = Some(user.clone());
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let mut users: Vec<UserAccount> = self
            .users
            .iter()
            .filter_map(|r| r.account.clone())
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn load_workspace(&self, id: WorkspaceId) -> AppResult<WorkspaceDocument> {
        Ok(self
            .workspaces
            .get(&id)
            .map(|doc| doc.clone())
            .unwrap_or_default())
    }

    async fn commit_structure(&self, commit: StructureCommit) -> AppResult<bool> {
        let StructureCommit {
            workspace_id,
            expected_version,
            structure,
            remove_agent,
            history,
        } = commit;

        {
            let mut doc = self.workspaces.entry(workspace_id).or_default();
            if doc.structure.version != expected_version {
                debug!(%workspace_id, expected_version, stored = doc.structure.version, "Structure commit lost the race");
                return Ok(false);
            }
            doc.structure = structure;
            if let Some(name) = remove_agent {
                doc.agents.remove(&name);
            }
        }

        self.history.entry(workspace_id).or_default().push(history);
        Ok(true)
    }

    async fn upsert_agent(
        &self,
        id: WorkspaceId,
        name: &str,
        description: &serde_json::Value,
    ) -> AppResult<()> {
        self.workspaces
            .entry(id)
            .or_default()
            .agents
            .insert(name.to_string(), description.clone());
        Ok(())
    }

    async fn load_selection(&self, user: UserId) -> AppResult<Vec<String>> {
        Ok(self
            .users
            .get(&user)
            .map(|r| r.selection.clone())
            .unwrap_or_default())
    }

    async fn save_selection(&self, user: UserId, selection: &[String]) -> AppResult<()> {
        self.require_user(user)?.selection = selection.to_vec();
        Ok(())
    }

    async fn save_onboarding(&self, user: UserId, profile: &OnboardingProfile) -> AppResult<()> {
        self.require_user(user)?.onboarding = Some(profile.clone());
        Ok(())
    }

    async fn load_onboarding(&self, user: UserId) -> AppResult<Option<OnboardingProfile>> {
        Ok(self.users.get(&user).and_then(|r| r.onboarding.clone()))
    }

    async fn history(&self, id: WorkspaceId, limit: usize) -> AppResult<Vec<HistoryEntry>> {
        Ok(self
            .history
            .get(&id)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
