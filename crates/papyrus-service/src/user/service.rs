//! Account resolution, registration and onboarding persistence.

use std::sync::Arc;

use tracing::info;

use papyrus_core::error::AppError;
use papyrus_core::result::AppResult;
use papyrus_core::types::UserId;
use papyrus_database::store::WorkspaceStore;
use papyrus_entity::onboarding::{OnboardingProfile, normalize_web};
use papyrus_entity::user::{AccountType, NewUser, UserAccount, UserContext};

use crate::context::RequestContext;

/// Manages accounts as known to the folder store.
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn WorkspaceStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { store }
    }

    /// Resolve the account behind a forwarded identity.
    pub async fn resolve(&self, id: UserId) -> AppResult<UserAccount> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::authentication(format!("Unknown user {id}")))
    }

    /// Permission summary for the caller.
    pub fn context(&self, ctx: &RequestContext) -> UserContext {
        UserContext::from(&ctx.user)
    }

    /// Create or replace an account.
    pub async fn register(&self, new_user: NewUser) -> AppResult<UserAccount> {
        let email = new_user.email.trim();
        if !email.contains('@') {
            return Err(AppError::validation(format!("Invalid email: '{email}'")));
        }
        if new_user.tipo_cuenta == AccountType::Empresa {
            if new_user.estructura_empresa_id.is_none() {
                return Err(AppError::validation(
                    "Company accounts need a shared workspace id",
                ));
            }
            if new_user.permiso.is_none() {
                return Err(AppError::validation("Company accounts need a permission"));
            }
        }

        let mut account = new_user.into_account();
        account.email = account.email.trim().to_string();
        self.store.upsert_user(&account).await?;
        info!(user_id = %account.id, tipo_cuenta = %account.tipo_cuenta, "User registered");
        Ok(account)
    }

    /// All accounts.
    pub async fn list(&self) -> AppResult<Vec<UserAccount>> {
        self.store.list_users().await
    }

    /// Persist the onboarding profile of the caller.
    pub async fn save_onboarding(
        &self,
        ctx: &RequestContext,
        mut profile: OnboardingProfile,
    ) -> AppResult<()> {
        profile.web = profile.web.and_then(|w| normalize_web(&w));
        self.store.save_onboarding(ctx.user_id(), &profile).await?;
        info!(user_id = %ctx.user_id(), "Onboarding data saved");
        Ok(())
    }

    /// The caller's saved onboarding profile.
    pub async fn onboarding(&self, ctx: &RequestContext) -> AppResult<Option<OnboardingProfile>> {
        self.store.load_onboarding(ctx.user_id()).await
    }
}
