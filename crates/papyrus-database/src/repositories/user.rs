//! User repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;

use papyrus_core::error::{AppError, ErrorKind};
use papyrus_core::result::AppResult;
use papyrus_core::types::UserId;
use papyrus_entity::onboarding::OnboardingProfile;
use papyrus_entity::user::UserAccount;

const USER_COLUMNS: &str = "id, email, tipo_cuenta, permiso, empresa, estructura_empresa_id, \
                            subscription_plan, created_at";

/// Repository for accounts and the per-user documents stored beside them.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// List all users ordered by email.
    pub async fn list(&self) -> AppResult<Vec<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY email ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    /// Insert a user or replace its account fields.
    pub async fn upsert(&self, user: &UserAccount) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, tipo_cuenta, permiso, empresa, estructura_empresa_id, \
                                subscription_plan, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
                email = EXCLUDED.email, \
                tipo_cuenta = EXCLUDED.tipo_cuenta, \
                permiso = EXCLUDED.permiso, \
                empresa = EXCLUDED.empresa, \
                estructura_empresa_id = EXCLUDED.estructura_empresa_id, \
                subscription_plan = EXCLUDED.subscription_plan",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.tipo_cuenta)
        .bind(user.permiso)
        .bind(&user.empresa)
        .bind(user.estructura_empresa_id)
        .bind(&user.subscription_plan)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save user", e))?;
        Ok(())
    }

    /// Load the favorite agent selection.
    pub async fn find_selection(&self, id: UserId) -> AppResult<Vec<String>> {
        let selection: Option<Json<Vec<String>>> =
            sqlx::query_scalar("SELECT agent_selection FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load selection", e)
                })?;
        Ok(selection.map(|Json(s)| s).unwrap_or_default())
    }

    /// Replace the favorite agent selection.
    pub async fn update_selection(&self, id: UserId, selection: &[String]) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET agent_selection = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(selection))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to save selection", e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    /// Store the onboarding profile.
    pub async fn update_onboarding(&self, id: UserId, profile: &OnboardingProfile) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET onboarding = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to save onboarding data", e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    /// Load the onboarding profile, if one was saved.
    pub async fn find_onboarding(&self, id: UserId) -> AppResult<Option<OnboardingProfile>> {
        let profile: Option<Option<Json<OnboardingProfile>>> =
            sqlx::query_scalar("SELECT onboarding FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load onboarding data", e)
                })?;
        Ok(profile.flatten().map(|Json(p)| p))
    }
}
