//! Folder history repository.

use sqlx::{PgPool, Postgres, Transaction};

use papyrus_core::error::{AppError, ErrorKind};
use papyrus_core::result::AppResult;
use papyrus_core::types::WorkspaceId;
use papyrus_entity::history::HistoryEntry;

/// Append-only log of accepted structural changes.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    /// Create a new history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recent entries for a workspace, newest first.
    pub async fn find_recent(&self, workspace_id: WorkspaceId, limit: i64) -> AppResult<Vec<HistoryEntry>> {
        sqlx::query_as::<_, HistoryEntry>(
            "SELECT workspace_id, action, detail, user_id, version, created_at \
             FROM folder_history WHERE workspace_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(workspace_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folder history", e))
    }

    /// Append an entry inside an open transaction.
    pub async fn insert(tx: &mut Transaction<'_, Postgres>, entry: &HistoryEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folder_history (workspace_id, action, detail, user_id, version, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.workspace_id)
        .bind(entry.action)
        .bind(&entry.detail)
        .bind(entry.user_id)
        .bind(entry.version)
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record folder history", e))?;
        Ok(())
    }
}
