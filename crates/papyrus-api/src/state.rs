//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use papyrus_core::config::AppConfig;
use papyrus_database::store::WorkspaceStore;
use papyrus_service::{AgentService, FolderService, SelectionService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Workspace store (PostgreSQL or in-memory)
    pub store: Arc<dyn WorkspaceStore>,
    /// Folder structure service
    pub folder_service: Arc<FolderService>,
    /// Agent catalog service
    pub agent_service: Arc<AgentService>,
    /// Favorite selection service
    pub selection_service: Arc<SelectionService>,
    /// Account service
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire every service over one store.
    pub fn new(config: AppConfig, store: Arc<dyn WorkspaceStore>) -> Self {
        let limits = Arc::new(config.plans.clone());
        Self {
            folder_service: Arc::new(FolderService::new(Arc::clone(&store))),
            agent_service: Arc::new(AgentService::new(Arc::clone(&store))),
            selection_service: Arc::new(SelectionService::new(Arc::clone(&store), limits)),
            user_service: Arc::new(UserService::new(Arc::clone(&store))),
            config: Arc::new(config),
            store,
        }
    }
}
