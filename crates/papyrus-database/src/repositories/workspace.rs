//! Workspace document repository.
//!
//! A workspace row holds the folder structure as JSONB next to a plain
//! `version` column. The column is the source of truth for optimistic
//! concurrency: commits are `UPDATE ... WHERE version = $expected`.

use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use papyrus_core::error::{AppError, ErrorKind};
use papyrus_core::result::AppResult;
use papyrus_core::types::WorkspaceId;
use papyrus_entity::folder::{AgentCatalog, FolderStructure};

use super::history::HistoryRepository;
use crate::store::{StructureCommit, WorkspaceDocument};

#[derive(Debug, FromRow)]
struct WorkspaceRow {
    structure: Json<FolderStructure>,
    version: i64,
    agents: Json<AgentCatalog>,
}

/// Repository for versioned workspace documents.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    /// Create a new workspace repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load a workspace; a missing row reads as an empty structure at version 1.
    pub async fn find(&self, id: WorkspaceId) -> AppResult<WorkspaceDocument> {
        let row = sqlx::query_as::<_, WorkspaceRow>(
            "SELECT structure, version, agents FROM workspaces WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load workspace", e))?;

        Ok(match row {
            Some(row) => {
                let mut structure = row.structure.0;
                structure.version = u64::try_from(row.version).unwrap_or_default();
                WorkspaceDocument {
                    structure,
                    agents: row.agents.0,
                }
            }
            None => WorkspaceDocument::default(),
        })
    }

    /// Apply a commit if the stored version still matches.
    ///
    /// Returns `false` without writing anything when another writer got
    /// there first.
    pub async fn commit(&self, commit: &StructureCommit) -> AppResult<bool> {
        let expected = to_db_version(commit.expected_version)?;
        let next = to_db_version(commit.structure.version)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })?;

        sqlx::query("INSERT INTO workspaces (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(commit.workspace_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create workspace", e))?;

        let updated = sqlx::query(
            "UPDATE workspaces SET \
                structure = $2, \
                version = $3, \
                agents = CASE WHEN $5::text IS NULL THEN agents ELSE agents - $5::text END, \
                updated_at = NOW() \
             WHERE id = $1 AND version = $4",
        )
        .bind(commit.workspace_id)
        .bind(Json(&commit.structure))
        .bind(next)
        .bind(expected)
        .bind(commit.remove_agent.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit structure", e))?;

        if updated.rows_affected() == 0 {
            debug!(workspace_id = %commit.workspace_id, expected, "Structure commit lost the race");
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back", e)
            })?;
            return Ok(false);
        }

        HistoryRepository::insert(&mut tx, &commit.history).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(true)
    }

    /// Insert or replace one catalog entry without touching the structure.
    pub async fn upsert_agent(
        &self,
        id: WorkspaceId,
        name: &str,
        description: &serde_json::Value,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO workspaces (id, agents) VALUES ($1, jsonb_build_object($2::text, $3::jsonb)) \
             ON CONFLICT (id) DO UPDATE SET \
                agents = workspaces.agents || jsonb_build_object($2::text, $3::jsonb), \
                updated_at = NOW()",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save agent", e))?;
        Ok(())
    }
}

fn to_db_version(version: u64) -> AppResult<i64> {
    i64::try_from(version)
        .map_err(|_| AppError::validation(format!("Version {version} is out of range")))
}
