//! reqwest implementation of [`RemoteFolderStore`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use papyrus_core::config::ClientConfig;
use papyrus_entity::folder::{AgentCatalog, FolderId, FolderStructure};
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserContext;

use super::{MutationAck, RemoteFolderStore};
use crate::error::{RemoteError, RemoteResult, error_from_body};

/// Header carrying the caller's identity.
const USER_ID_HEADER: &str = "x-user-id";

/// Talks to the Papyrus HTTP API.
#[derive(Debug, Clone)]
pub struct HttpFolderStore {
    base_url: Url,
    user_id: Option<String>,
    http: reqwest::Client,
}

#[derive(serde::Deserialize)]
struct ContextEnvelope {
    data: FolderStructure,
}

#[derive(serde::Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(serde::Deserialize)]
struct SelectionEnvelope {
    #[serde(default)]
    seleccion: Vec<String>,
}

#[derive(serde::Deserialize)]
struct UserContextEnvelope {
    context: UserContext,
}

impl HttpFolderStore {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> RemoteResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| RemoteError::Request(format!("invalid base url '{}': {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms.max(250)))
            .build()
            .map_err(RemoteError::from)?;
        Ok(Self {
            base_url,
            user_id: config.user_id.clone(),
            http,
        })
    }

    /// Endpoint URL for the given path segments under `/api`.
    pub fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::Request(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn call<B, T>(&self, method: Method, segments: &[&str], body: Option<&B>) -> RemoteResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "Remote call");

        let mut request = self.http.request(method, url);
        if let Some(user_id) = &self.user_id {
            request = request.header(USER_ID_HEADER, user_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> RemoteResult<T> {
        self.call::<(), T>(Method::GET, segments, None).await
    }
}

#[async_trait]
impl RemoteFolderStore for HttpFolderStore {
    async fn user_context(&self) -> RemoteResult<UserContext> {
        let envelope: UserContextEnvelope = self.get(&["user-context"]).await?;
        Ok(envelope.context)
    }

    async fn folder_context(&self) -> RemoteResult<FolderStructure> {
        let envelope: ContextEnvelope = self.get(&["carpetas-context"]).await?;
        Ok(envelope.data)
    }

    async fn agent_catalog(&self) -> RemoteResult<AgentCatalog> {
        let envelope: DataEnvelope<AgentCatalog> = self.get(&["etiquetas-context"]).await?;
        Ok(envelope.data)
    }

    async fn selection(&self) -> RemoteResult<Vec<String>> {
        let envelope: SelectionEnvelope = self.get(&["agentes-seleccion-personalizada"]).await?;
        Ok(envelope.seleccion)
    }

    async fn save_selection(&self, agents: &[String]) -> RemoteResult<()> {
        let _: serde_json::Value = self
            .call(
                Method::POST,
                &["agentes-seleccion-personalizada"],
                Some(&json!({ "seleccion": agents })),
            )
            .await?;
        Ok(())
    }

    async fn assign_agent(
        &self,
        agent: &str,
        folder: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        let body = json!({
            "agenteName": agent,
            "folderId": folder,
            "expectedVersion": expected_version,
        });
        self.call(Method::POST, &["carpetas", "assign"], Some(&body)).await
    }

    async fn create_folder(
        &self,
        nombre: &str,
        parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        let body = json!({
            "nombre": nombre,
            "parentId": parent,
            "expectedVersion": expected_version,
        });
        self.call(Method::POST, &["carpetas"], Some(&body)).await
    }

    async fn rename_folder(
        &self,
        id: &FolderId,
        new_name: &str,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        let body = json!({ "newName": new_name, "expectedVersion": expected_version });
        self.call(Method::PUT, &["carpetas", id.as_str(), "rename"], Some(&body))
            .await
    }

    async fn move_folder(
        &self,
        id: &FolderId,
        new_parent: Option<&FolderId>,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        let body = json!({ "newParentId": new_parent, "expectedVersion": expected_version });
        self.call(Method::PUT, &["carpetas", id.as_str(), "move"], Some(&body))
            .await
    }

    async fn delete_folder(
        &self,
        id: &FolderId,
        expected_version: u64,
    ) -> RemoteResult<MutationAck> {
        let body = json!({ "expectedVersion": expected_version });
        self.call(Method::DELETE, &["carpetas", id.as_str()], Some(&body))
            .await
    }

    async fn delete_agent(&self, name: &str, expected_version: u64) -> RemoteResult<MutationAck> {
        let body = json!({ "expectedVersion": expected_version });
        self.call(Method::DELETE, &["etiquetas", name], Some(&body)).await
    }

    async fn save_onboarding(&self, profile: &OnboardingProfile) -> RemoteResult<()> {
        let _: serde_json::Value = self
            .call(Method::POST, &["save-onboarding-data"], Some(profile))
            .await?;
        Ok(())
    }

    async fn regulatory_profile(&self, answers: &serde_json::Value) -> RemoteResult<()> {
        let _: serde_json::Value = self
            .call(
                Method::POST,
                &["regulatory-profile"],
                Some(&json!({ "answers": answers })),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> HttpFolderStore {
        let config = ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        };
        HttpFolderStore::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let s = store("http://127.0.0.1:8080/");
        let url = s.endpoint(&["carpetas", "f1", "rename"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/carpetas/f1/rename");
    }

    #[test]
    fn test_endpoint_escapes_agent_names() {
        let s = store("http://localhost:8080/papyrus");
        let url = s.endpoint(&["etiquetas", "Banca y Seguros/ES"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/papyrus/api/etiquetas/Banca%20y%20Seguros%2FES"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "not a url".into(),
            ..ClientConfig::default()
        };
        assert!(HttpFolderStore::new(&config).is_err());
    }
}
