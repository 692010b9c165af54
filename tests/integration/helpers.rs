//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use papyrus_api::{AppState, build_app};
use papyrus_core::config::AppConfig;
use papyrus_core::types::WorkspaceId;
use papyrus_database::store::{MemoryWorkspaceStore, WorkspaceStore};
use papyrus_entity::user::{AccountType, NewUser, Permission, UserAccount};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application state, shared with spawned servers
    pub state: AppState,
    /// Backing store for direct seeding
    pub store: Arc<MemoryWorkspaceStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when empty
    pub body: Value,
}

impl TestApp {
    /// Create a new test application on the memory store
    pub async fn new() -> Self {
        let store = Arc::new(MemoryWorkspaceStore::new());
        let dyn_store: Arc<dyn WorkspaceStore> = store.clone();
        let state = AppState::new(AppConfig::default(), dyn_store);
        Self {
            router: build_app(state.clone()),
            state,
            store,
        }
    }

    /// Seed an account directly in the store
    pub async fn create_user(
        &self,
        email: &str,
        tipo_cuenta: AccountType,
        permiso: Option<Permission>,
        workspace: Option<WorkspaceId>,
        plan: &str,
    ) -> UserAccount {
        let account = NewUser {
            id: None,
            email: email.to_string(),
            tipo_cuenta,
            permiso,
            empresa: workspace.map(|_| "Acme".to_string()),
            estructura_empresa_id: workspace,
            subscription_plan: plan.to_string(),
        }
        .into_account();
        self.store
            .upsert_user(&account)
            .await
            .expect("Failed to seed user");
        account
    }

    /// Individual account on the given plan
    pub async fn individual(&self, email: &str, plan: &str) -> UserAccount {
        self.create_user(email, AccountType::Individual, None, None, plan)
            .await
    }

    /// Company member of a shared workspace
    pub async fn member(
        &self,
        email: &str,
        workspace: WorkspaceId,
        permiso: Permission,
    ) -> UserAccount {
        self.create_user(email, AccountType::Empresa, Some(permiso), Some(workspace), "plan3")
            .await
    }

    /// Add an agent to the user's workspace catalog
    pub async fn add_agent(&self, user: &UserAccount, name: &str) {
        self.store
            .upsert_agent(
                user.workspace_id(),
                name,
                &serde_json::json!({ "descripcion": format!("Agente {name}") }),
            )
            .await
            .expect("Failed to seed agent");
    }

    /// Make an API request as `user`
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&UserAccount>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.id.to_string());
        }
        let body = match body {
            Some(json) => Body::from(serde_json::to_vec(&json).expect("Failed to encode body")),
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Current folder context for `user`
    pub async fn context(&self, user: &UserAccount) -> Value {
        let response = self
            .request("GET", "/api/carpetas-context", None, Some(user))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }

    /// Current structure version for `user`
    pub async fn version(&self, user: &UserAccount) -> u64 {
        self.context(user).await["data"]["version"]
            .as_u64()
            .expect("version missing")
    }

    /// Create a folder and return its id
    pub async fn create_folder(
        &self,
        user: &UserAccount,
        nombre: &str,
        parent: Option<&str>,
    ) -> String {
        let version = self.version(user).await;
        let response = self
            .request(
                "POST",
                "/api/carpetas",
                Some(serde_json::json!({
                    "nombre": nombre,
                    "parentId": parent,
                    "expectedVersion": version,
                })),
                Some(user),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["folderId"]
            .as_str()
            .expect("folderId missing")
            .to_string()
    }

    /// Serve the API on an ephemeral port for real HTTP clients
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local address");
        let state = self.state.clone();
        tokio::spawn(papyrus_api::app::serve_on(
            listener,
            state,
            std::future::pending(),
            Duration::from_secs(1),
        ));
        addr
    }
}
