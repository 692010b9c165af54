//! Favorite keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::folder::FolderId;

const FOLDER_PREFIX: &str = "folder:";

/// An entry in a user's favorites set.
///
/// Agents are keyed by name, folders by `folder:<id>`. Only agent keys are
/// ever persisted remotely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FavoriteKey {
    /// A favorited agent.
    Agent(String),
    /// A favorited folder.
    Folder(FolderId),
}

impl FavoriteKey {
    /// Key for a folder.
    pub fn folder(id: &FolderId) -> Self {
        Self::Folder(id.clone())
    }

    /// Key for an agent.
    pub fn agent(name: impl Into<String>) -> Self {
        Self::Agent(name.into())
    }

    /// Whether this key names a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// The agent name, for agent keys.
    pub fn as_agent(&self) -> Option<&str> {
        match self {
            Self::Agent(name) => Some(name),
            Self::Folder(_) => None,
        }
    }
}

impl From<String> for FavoriteKey {
    fn from(raw: String) -> Self {
        match raw.strip_prefix(FOLDER_PREFIX) {
            Some(id) => Self::Folder(FolderId::from(id)),
            None => Self::Agent(raw),
        }
    }
}

impl From<FavoriteKey> for String {
    fn from(key: FavoriteKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(name) => f.write_str(name),
            Self::Folder(id) => write!(f, "{FOLDER_PREFIX}{id}"),
        }
    }
}
