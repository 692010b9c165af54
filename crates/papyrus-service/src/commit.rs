//! Versioned read-modify-write against the workspace store.

use tracing::{debug, info};

use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_database::store::{StructureCommit, WorkspaceDocument, WorkspaceStore};
use papyrus_entity::history::{HistoryAction, HistoryEntry};

use crate::context::RequestContext;

/// What a mutation changed, for the history log.
#[derive(Debug)]
pub(crate) struct Change {
    pub detail: serde_json::Value,
    pub remove_agent: Option<String>,
}

impl Change {
    pub(crate) fn new(detail: serde_json::Value) -> Self {
        Self {
            detail,
            remove_agent: None,
        }
    }
}

/// Load the caller's workspace, apply `mutate` to a copy and commit it.
///
/// Order of checks: `mutate` validates the request against the current
/// structure first, then `expected_version` is compared with the stored
/// version, and finally the store's compare-and-swap decides races.
/// Returns the new structure version.
pub(crate) async fn apply_change<F>(
    store: &dyn WorkspaceStore,
    ctx: &RequestContext,
    expected_version: Option<u64>,
    action: HistoryAction,
    mutate: F,
) -> AppResult<u64>
where
    F: FnOnce(&mut WorkspaceDocument) -> AppResult<Change>,
{
    let workspace_id = ctx.workspace_id();
    let current = store.load_workspace(workspace_id).await?;
    let current_version = current.structure.version;

    let mut next = current;
    let change = mutate(&mut next)?;

    if let Some(expected) = expected_version {
        if expected != current_version {
            debug!(%workspace_id, expected, current_version, %action, "Rejected stale mutation");
            return Err(AppError::version_conflict(current_version));
        }
    }

    let new_version = current_version + 1;
    next.structure.version = new_version;

    let commit = StructureCommit {
        workspace_id,
        expected_version: current_version,
        structure: next.structure,
        remove_agent: change.remove_agent,
        history: HistoryEntry::record(workspace_id, action, change.detail, ctx.user_id(), new_version),
    };

    if !store.commit_structure(commit).await? {
        let latest = store.load_workspace(workspace_id).await?.structure.version;
        return Err(AppError::version_conflict(latest));
    }

    info!(
        %workspace_id,
        user_id = %ctx.user_id(),
        %action,
        version = new_version,
        "Folder structure updated"
    );
    Ok(new_version)
}
