//! End-to-end tests: the folder controller against a live server.

mod helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use papyrus_core::config::ClientConfig;
use papyrus_entity::folder::FolderId;
use papyrus_entity::user::UserAccount;
use papyrus_client::cache::FolderFavoritesCache;
use papyrus_client::render::{GridView, TreeView};
use papyrus_client::{
    ClientHost, ControllerSettings, FolderController, HttpFolderStore, Outcome, Toast,
};

#[derive(Default)]
struct QuietHost {
    toasts: Mutex<Vec<Toast>>,
    reloads: Mutex<Vec<Duration>>,
}

impl ClientHost for QuietHost {
    fn toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }

    fn render_tree(&self, _view: &TreeView) {}

    fn render_agents_grid(&self, _view: &GridView) {}

    fn remove_agent_card(&self, _agent: &str) {}

    fn schedule_reload(&self, delay: Duration) {
        self.reloads.lock().unwrap().push(delay);
    }
}

struct Session {
    app: helpers::TestApp,
    user: UserAccount,
    host: Arc<QuietHost>,
    controller: FolderController,
    state_dir: std::path::PathBuf,
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.state_dir);
    }
}

async fn session() -> Session {
    let app = helpers::TestApp::new().await;
    let user = app.individual("e2e@example.com", "plan2").await;
    for agent in ["CNMC", "BOE"] {
        app.add_agent(&user, agent).await;
    }
    let addr = app.spawn().await;

    let state_dir = std::env::temp_dir().join(format!("papyrus-e2e-{}", uuid::Uuid::new_v4()));
    let config = ClientConfig {
        base_url: format!("http://{addr}"),
        user_id: Some(user.id.to_string()),
        state_dir: state_dir.to_string_lossy().into_owned(),
        ..ClientConfig::default()
    };
    let remote = Arc::new(HttpFolderStore::new(&config).expect("client"));
    let host = Arc::new(QuietHost::default());
    let controller = FolderController::new(
        remote,
        host.clone(),
        FolderFavoritesCache::new(&state_dir),
        ControllerSettings::from(&config),
    );
    controller.init().await;

    Session {
        app,
        user,
        host,
        controller,
        state_dir,
    }
}

#[tokio::test]
async fn test_init_loads_server_state() {
    let s = session().await;

    let state = s.controller.snapshot().await;

    assert_eq!(state.structure.version, 1);
    assert!(state.catalog.contains_key("CNMC"));
    assert!(state.user.can_drag());
    assert!(state.user.can_create_folder());
}

#[tokio::test]
async fn test_create_and_move_match_server() {
    let s = session().await;

    assert_eq!(s.controller.create_folder("Energía").await, Outcome::Applied);
    let state = s.controller.snapshot().await;
    let folder: FolderId = state
        .structure
        .folders
        .values()
        .find(|f| f.nombre == "Energía")
        .map(|f| f.id.clone())
        .expect("folder created");

    let outcome = s.controller.move_agent_to("CNMC", Some(folder.clone())).await;
    assert_eq!(outcome, Outcome::Applied);

    let state = s.controller.snapshot().await;
    assert_eq!(state.counts.get(&folder), 1);
    let server = s.app.context(&s.user).await;
    assert_eq!(
        serde_json::to_value(&state.structure).expect("serialize"),
        server["data"]
    );
    assert_eq!(server["counts"][folder.as_str()], 1);
}

#[tokio::test]
async fn test_out_of_band_change_is_conflict() {
    let s = session().await;
    s.app.create_folder(&s.user, "Desde otra pestaña", None).await;

    let outcome = s.controller.create_folder("Local").await;

    assert_eq!(outcome, Outcome::Conflict { current_version: Some(2) });
    assert_eq!(s.host.reloads.lock().unwrap().len(), 1);
    let server = s.app.context(&s.user).await;
    assert_eq!(server["data"]["version"], 2);

    s.controller.reload().await;
    assert_eq!(s.controller.create_folder("Local").await, Outcome::Applied);
}

#[tokio::test]
async fn test_favorites_persist_to_server() {
    let s = session().await;

    assert_eq!(s.controller.toggle_agent_favorite("CNMC").await, Outcome::Applied);

    let response = s
        .app
        .request("GET", "/api/agentes-seleccion-personalizada", None, Some(&s.user))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["seleccion"], json!(["CNMC"]));
}

#[tokio::test]
async fn test_non_empty_folder_delete_is_rejected() {
    let s = session().await;
    let folder = FolderId::from(s.app.create_folder(&s.user, "Banca", None).await);
    s.controller.reload().await;
    s.controller.move_agent_to("BOE", Some(folder.clone())).await;

    let outcome = s.controller.delete_folder(&folder).await;

    assert!(matches!(outcome, Outcome::Failed(_)), "{outcome:?}");
    assert!(s.controller.snapshot().await.structure.contains(&folder));
}
