//! The remote folder store as seen by the client.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use papyrus_entity::folder::{AgentCatalog, FolderId, FolderStructure};
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserContext;

use crate::error::RemoteResult;

pub use http::HttpFolderStore;

/// Acknowledgement of a versioned mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationAck {
    /// Created folder, for folder creation.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Structure version after the change.
    #[serde(default)]
    pub new_version: Option<u64>,
}

/// Operations the client needs from the folder store.
///
/// Every mutating call carries the structure version the client last saw.
#[async_trait]
pub trait RemoteFolderStore: Send + Sync {
    /// Permission flags of the caller.
    async fn user_context(&self) -> RemoteResult<UserContext>;

    /// Folders, assignments and version.
    async fn folder_context(&self) -> RemoteResult<FolderStructure>;

    /// Available agents.
    async fn agent_catalog(&self) -> RemoteResult<AgentCatalog>;

    /// Favorite agent names.
    async fn selection(&self) -> RemoteResult<Vec<String>>;

    /// Replace the favorite agent names.
    async fn save_selection(&self, agents: &[String]) -> RemoteResult<()>;

    /// Move an agent into a folder, or to root for `None`.
    async fn assign_agent(
        &self,
        agent: &str,
        folder: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck>;

    /// Create a folder.
    async fn create_folder(
        &self,
        nombre: &str,
        parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck>;

    /// Rename a folder.
    async fn rename_folder(
        &self,
        id: &FolderId,
        new_name: &str,
        expected_version: u64,
    ) -> RemoteResult<MutationAck>;

    /// Re-parent a folder.
    async fn move_folder(
        &self,
        id: &FolderId,
        new_parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck>;

    /// Delete an empty folder.
    async fn delete_folder(&self, id: &FolderId, expected_version: u64)
    -> RemoteResult<MutationAck>;

    /// Delete an agent from the catalog.
    async fn delete_agent(&self, name: &str, expected_version: u64) -> RemoteResult<MutationAck>;

    /// Store the onboarding profile.
    async fn save_onboarding(&self, profile: &OnboardingProfile) -> RemoteResult<()>;

    /// Hand the raw onboarding answers to the profile generator.
    async fn regulatory_profile(&self, answers: &serde_json::Value) -> RemoteResult<()>;
}
