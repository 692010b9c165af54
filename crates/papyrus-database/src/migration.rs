//! Embedded schema migrations for the workspace tables.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use papyrus_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the users, workspaces and folder_history tables up to date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0);
    info!(known = MIGRATOR.iter().count(), latest, "Applying workspace schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Workspace schema migration failed: {e}"),
            e,
        )
    })?;

    info!(latest, "Workspace schema is current");
    Ok(())
}
