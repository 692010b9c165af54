//! Workspace store backend configuration.

use serde::{Deserialize, Serialize};

/// Selects where folder structures, catalogs and selections live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider: `"memory"` or `"postgres"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Run pending migrations on startup (postgres only).
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            run_migrations: default_true(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_true() -> bool {
    true
}
