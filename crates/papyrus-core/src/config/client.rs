//! Client subsystem configuration.

use serde::{Deserialize, Serialize};

/// How folder membership is resolved when deriving folder favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesScope {
    /// Agents assigned to the folder or any descendant.
    #[default]
    Recursive,
    /// Only agents assigned directly to the folder.
    Direct,
}

/// Settings for the optimistic client that talks to the folder store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the folder store API (without the `/api` suffix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identity forwarded in the `X-User-Id` header.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Upper bound for a single remote call, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Delay before a forced reload after a version conflict.
    #[serde(default = "default_conflict_reload_delay")]
    pub conflict_reload_delay_ms: u64,
    /// Lifetime of transient notifications.
    #[serde(default = "default_toast_ttl")]
    pub toast_ttl_ms: u64,
    /// Directory for locally persisted client state.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Folder membership scope for favorites propagation.
    #[serde(default)]
    pub favorites_scope: FavoritesScope,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
            request_timeout_ms: default_request_timeout(),
            conflict_reload_delay_ms: default_conflict_reload_delay(),
            toast_ttl_ms: default_toast_ttl(),
            state_dir: default_state_dir(),
            favorites_scope: FavoritesScope::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_conflict_reload_delay() -> u64 {
    2000
}

fn default_toast_ttl() -> u64 {
    2500
}

fn default_state_dir() -> String {
    "data/client".to_string()
}
