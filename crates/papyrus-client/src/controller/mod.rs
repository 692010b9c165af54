//! Optimistic mutation controller.
//!
//! Structural mutations run one at a time behind a single-flight latch.
//! Agent moves are applied to the mirror before the remote call and are
//! reverted exactly when the call fails; folder edits call the server
//! first and reload afterwards. Version conflicts schedule a full reload.

mod favorites;
mod mutation;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use papyrus_core::config::{ClientConfig, FavoritesScope};
use papyrus_entity::folder::{FolderId, FolderStructure};
use papyrus_entity::user::UserContext;

use crate::cache::FolderFavoritesCache;
use crate::error::{RemoteError, RemoteResult};
use crate::favorites::FavoritesSet;
use crate::host::{ClientHost, Toast, ToastKind};
use crate::remote::RemoteFolderStore;
use crate::render::{render_grid, render_tree};
use crate::state::ClientState;

/// Agent move confirmed.
pub const MOVE_OK: &str = "Se ha movido el agente correctamente";
/// Agent move failed and was reverted.
pub const MOVE_FAILED: &str = "Ha surgido un error al mover el agente";
/// Version conflict; a reload follows.
pub const CONFLICT_RELOAD: &str =
    "Conflicto de versión. La página se actualizará automáticamente.";
/// Folder move failed.
pub const OPERATION_FAILED: &str = "No se pudo completar la operación";
/// Folder creation failed.
pub const CREATE_FAILED: &str = "No se pudo crear la carpeta";
/// Folder rename failed.
pub const RENAME_FAILED: &str = "No se pudo renombrar la carpeta";
/// Folder or agent deletion failed.
pub const DELETE_FAILED: &str = "No se pudo eliminar";
/// Agent deletion confirmed.
pub const AGENT_DELETED: &str = "Agente eliminado";
/// Favorites could not be saved.
pub const FAVORITES_FAILED: &str = "No se pudo actualizar favoritos";
/// Tooltip for the disabled "new folder" action.
pub const CREATE_DENIED: &str =
    "No tienes permiso para crear carpetas. Habla con tu admin para que te lo conceda o la cree él";
/// Tooltip for disabled drag handles and folder menus.
pub const MOVE_DENIED: &str =
    "No tienes permiso para mover agentes o carpetas. Pide acceso de edición a tu admin";

/// Result of a user gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change was committed and the mirror reconciled.
    Applied,
    /// Nothing to do, or another mutation was in flight.
    Ignored,
    /// The gesture is not allowed; carries the tooltip text.
    Denied(&'static str),
    /// The server or network rejected the change; local state was restored.
    Failed(String),
    /// The structure moved underneath; a reload is scheduled.
    Conflict {
        /// Version the server reported.
        current_version: Option<u64>,
    },
}

/// Timing and favorites settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Deadline for each remote call.
    pub request_timeout: Duration,
    /// Delay before the reload that follows a conflict.
    pub conflict_reload_delay: Duration,
    /// Toast lifetime.
    pub toast_ttl: Duration,
    /// Membership scope for folder favorites.
    pub favorites_scope: FavoritesScope,
}

impl From<&ClientConfig> for ControllerSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            conflict_reload_delay: Duration::from_millis(config.conflict_reload_delay_ms),
            toast_ttl: Duration::from_millis(config.toast_ttl_ms),
            favorites_scope: config.favorites_scope,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Releases the single-flight latch when dropped.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the client state and drives every mutation.
pub struct FolderController {
    remote: Arc<dyn RemoteFolderStore>,
    host: Arc<dyn ClientHost>,
    cache: FolderFavoritesCache,
    settings: ControllerSettings,
    state: RwLock<ClientState>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for FolderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderController")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl FolderController {
    /// Creates a controller with an empty mirror.
    pub fn new(
        remote: Arc<dyn RemoteFolderStore>,
        host: Arc<dyn ClientHost>,
        cache: FolderFavoritesCache,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            remote,
            host,
            cache,
            settings,
            state: RwLock::new(ClientState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ClientState {
        self.state.read().await.clone()
    }

    /// Whether a structural mutation is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resolve permissions, load everything and paint.
    pub async fn init(&self) {
        let user = match self.timed(self.remote.user_context()).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "User context unavailable, continuing without edit rights");
                UserContext::default()
            }
        };
        self.state.write().await.user = user;
        self.reload().await;
    }

    /// Fetch structure, selection and catalog concurrently.
    ///
    /// Each failed fetch falls back to an empty default.
    pub async fn load_all(&self) {
        let (structure, selection, catalog) = tokio::join!(
            self.timed(self.remote.folder_context()),
            self.timed(self.remote.selection()),
            self.timed(self.remote.agent_catalog()),
        );

        let structure = structure.unwrap_or_else(|e| {
            warn!(error = %e, "Folder structure unavailable, using empty structure");
            FolderStructure::default()
        });
        let selection = selection.unwrap_or_else(|e| {
            warn!(error = %e, "Favorite selection unavailable, using empty set");
            Vec::new()
        });
        let catalog = catalog.unwrap_or_else(|e| {
            warn!(error = %e, "Agent catalog unavailable, using empty catalog");
            Default::default()
        });
        let cached_folders = self.cache.load().await;

        let folder_keys = {
            let mut state = self.state.write().await;
            state.replace_structure(structure);
            state.catalog = catalog;
            state.favorites = FavoritesSet::from_selection(selection);
            state.favorites.merge_folders(cached_folders);
            state.propagate_favorites(self.settings.favorites_scope);
            debug!(
                version = state.version(),
                folders = state.structure.folders.len(),
                favorites = state.favorites.len(),
                "Mirror loaded"
            );
            state.favorites.folders()
        };
        self.store_folder_keys(&folder_keys).await;
    }

    /// Load everything again and repaint.
    pub async fn reload(&self) {
        self.load_all().await;
        let state = self.state.read().await;
        self.paint(&state);
    }

    /// Open a folder, or the root for `None`.
    pub async fn enter_folder(&self, id: Option<FolderId>) {
        let mut state = self.state.write().await;
        state.enter_folder(id);
        self.paint(&state);
    }

    /// Move the cursor one level up.
    pub async fn go_up(&self) {
        let mut state = self.state.write().await;
        state.go_up();
        self.paint(&state);
    }

    /// Toggle the favorites-only view.
    pub async fn set_favorites_only(&self, enabled: bool) {
        let mut state = self.state.write().await;
        state.favorites_only = enabled;
        self.paint(&state);
    }

    fn paint(&self, state: &ClientState) {
        self.host.render_tree(&render_tree(state));
        self.host.render_agents_grid(&render_grid(state));
    }

    fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                flag: &self.in_flight,
            })
    }

    async fn timed<T>(&self, call: impl Future<Output = RemoteResult<T>>) -> RemoteResult<T> {
        tokio::time::timeout(self.settings.request_timeout, call)
            .await
            .unwrap_or(Err(RemoteError::Timeout))
    }

    fn toast(&self, message: &str, kind: ToastKind) {
        self.host.toast(Toast {
            message: message.to_string(),
            kind,
            ttl: self.settings.toast_ttl,
        });
    }

    fn conflict(&self, current_version: Option<u64>) -> Outcome {
        info!(?current_version, "Version conflict, scheduling reload");
        self.toast(CONFLICT_RELOAD, ToastKind::Error);
        self.host.schedule_reload(self.settings.conflict_reload_delay);
        Outcome::Conflict { current_version }
    }

    /// Toast and classify a failed remote call.
    fn failure(&self, err: RemoteError, message: &str) -> Outcome {
        match err {
            RemoteError::Conflict {
                current_version, ..
            } => self.conflict(current_version),
            other => {
                warn!(error = %other, "Remote mutation failed");
                self.toast(message, ToastKind::Error);
                Outcome::Failed(other.server_message())
            }
        }
    }

    async fn store_folder_keys(&self, folders: &[FolderId]) {
        if let Err(e) = self.cache.save(folders).await {
            warn!(path = %self.cache.path().display(), error = %e, "Cannot write folder favorites cache");
        }
    }
}
