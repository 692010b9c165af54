//! Shared fixtures for service tests.

use std::sync::Arc;

use papyrus_core::config::PlanLimits;
use papyrus_core::types::WorkspaceId;
use papyrus_database::store::{MemoryWorkspaceStore, WorkspaceStore};
use papyrus_entity::user::{AccountType, NewUser, Permission};

use crate::{AgentService, FolderService, RequestContext, SelectionService, UserService};

pub struct Fixture {
    pub store: Arc<MemoryWorkspaceStore>,
    pub folders: FolderService,
    pub agents: AgentService,
    pub selection: SelectionService,
    pub users: UserService,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryWorkspaceStore::new());
        let dyn_store: Arc<dyn WorkspaceStore> = store.clone();
        Self {
            folders: FolderService::new(dyn_store.clone()),
            agents: AgentService::new(dyn_store.clone()),
            selection: SelectionService::new(dyn_store.clone(), Arc::new(PlanLimits::default())),
            users: UserService::new(dyn_store),
            store,
        }
    }

    pub async fn add_agent(&self, ctx: &RequestContext, name: &str) {
        self.agents
            .upsert(ctx, name, serde_json::json!({ "descripcion": name }))
            .await
            .unwrap();
    }

    async fn register(&self, user: NewUser) -> RequestContext {
        RequestContext::new(self.users.register(user).await.unwrap())
    }
}

pub async fn individual(fx: &Fixture) -> RequestContext {
    fx.register(NewUser {
        id: None,
        email: "solo@example.com".into(),
        tipo_cuenta: AccountType::Individual,
        permiso: None,
        empresa: None,
        estructura_empresa_id: None,
        subscription_plan: "plan2".into(),
    })
    .await
}

fn member(email: &str, workspace: WorkspaceId, permiso: Permission) -> NewUser {
    NewUser {
        id: None,
        email: email.into(),
        tipo_cuenta: AccountType::Empresa,
        permiso: Some(permiso),
        empresa: Some("Acme".into()),
        estructura_empresa_id: Some(workspace),
        subscription_plan: "plan4".into(),
    }
}

pub async fn admin_of(fx: &Fixture) -> RequestContext {
    fx.register(member("admin@acme.es", WorkspaceId::new(), Permission::Admin))
        .await
}

pub async fn editor_of(fx: &Fixture, admin: &RequestContext) -> RequestContext {
    fx.register(member("editor@acme.es", admin.workspace_id(), Permission::Edicion))
        .await
}

pub async fn reader_of(fx: &Fixture, admin: &RequestContext) -> RequestContext {
    fx.register(member("reader@acme.es", admin.workspace_id(), Permission::Lectura))
        .await
}
