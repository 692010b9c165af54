//! Folder history log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use papyrus_core::types::{UserId, WorkspaceId};

/// Kind of structural change recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "history_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// A folder was created.
    Create,
    /// A folder was renamed.
    Rename,
    /// A folder was moved.
    Move,
    /// A folder was deleted.
    Delete,
    /// An agent was assigned to a folder or to root.
    Assign,
    /// An agent was removed from the catalog.
    RemoveAgent,
}

impl HistoryAction {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::RemoveAgent => "remove_agent",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted structural change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Workspace the change applied to.
    pub workspace_id: WorkspaceId,
    /// What happened.
    pub action: HistoryAction,
    /// Action-specific details (names, ids, previous values).
    pub detail: serde_json::Value,
    /// Who made the change.
    pub user_id: UserId,
    /// Structure version produced by the change.
    pub version: i64,
    /// When the change was committed.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn record(
        workspace_id: WorkspaceId,
        action: HistoryAction,
        detail: serde_json::Value,
        user_id: UserId,
        version: u64,
    ) -> Self {
        Self {
            workspace_id,
            action,
            detail,
            user_id,
            version: i64::try_from(version).unwrap_or(i64::MAX),
            created_at: Utc::now(),
        }
    }
}
