//! Local persistence of folder-favorite keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use papyrus_core::result::AppResult;
use papyrus_entity::folder::FolderId;

/// Entry name inside the state file.
pub const FOLDER_FAVORITES_KEY: &str = "papyrus_folder_fav";

const STATE_FILE: &str = "client_state.json";

/// JSON file holding folder-favorite ids, one entry per key.
#[derive(Debug, Clone)]
pub struct FolderFavoritesCache {
    path: PathBuf,
}

impl FolderFavoritesCache {
    /// Cache stored under `state_dir`.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(STATE_FILE),
        }
    }

    /// File backing the cache.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached folder ids. A missing or unreadable file yields nothing.
    pub async fn load(&self) -> Vec<FolderId> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read folder favorites cache");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<BTreeMap<String, serde_json::Value>>(&bytes) {
            Ok(mut entries) => entries
                .remove(FOLDER_FAVORITES_KEY)
                .and_then(|v| serde_json::from_value::<Vec<FolderId>>(v).ok())
                .unwrap_or_default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt folder favorites cache ignored");
                Vec::new()
            }
        }
    }

    /// Replace the cached folder ids, keeping other entries of the file.
    pub async fn save(&self, folders: &[FolderId]) -> AppResult<()> {
        let mut entries: BTreeMap<String, serde_json::Value> = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => BTreeMap::new(),
        };
        entries.insert(FOLDER_FAVORITES_KEY.to_string(), serde_json::to_value(folders)?);

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&entries)?).await?;
        Ok(())
    }
}
