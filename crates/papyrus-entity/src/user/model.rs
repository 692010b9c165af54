//! User account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use papyrus_core::types::{UserId, WorkspaceId};

use super::account::{AccountType, Permission};

/// A user account as seen by the folder store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    /// Unique user identifier.
    pub id: UserId,
    /// Contact email.
    pub email: String,
    /// Personal or company account.
    pub tipo_cuenta: AccountType,
    /// Company permission, when the account belongs to a company.
    pub permiso: Option<Permission>,
    /// Company name.
    pub empresa: Option<String>,
    /// Shared company workspace.
    pub estructura_empresa_id: Option<WorkspaceId>,
    /// Subscription plan name (`plan1`..`plan4`).
    pub subscription_plan: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Whether the account is a company member.
    pub fn is_empresa(&self) -> bool {
        self.tipo_cuenta == AccountType::Empresa
    }

    /// The workspace whose folder structure this user reads and edits.
    pub fn workspace_id(&self) -> WorkspaceId {
        match (self.tipo_cuenta, self.estructura_empresa_id) {
            (AccountType::Empresa, Some(ws)) => ws,
            _ => WorkspaceId::from(self.id),
        }
    }

    /// Company member with admin or edicion rights.
    pub fn can_edit_empresa(&self) -> bool {
        self.is_empresa()
            && self
                .permiso
                .is_some_and(|p| p.has_at_least(&Permission::Edicion))
    }

    /// Company member with admin rights.
    pub fn is_admin(&self) -> bool {
        self.is_empresa() && self.permiso == Some(Permission::Admin)
    }

    /// May create, rename, move and delete folders.
    pub fn can_manage_folders(&self) -> bool {
        !self.is_empresa() || self.is_admin()
    }

    /// May assign agents and edit the agent catalog.
    pub fn can_assign_agents(&self) -> bool {
        !self.is_empresa() || self.can_edit_empresa()
    }
}

/// Data required to create or replace a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Explicit id; a fresh one is generated when absent.
    pub id: Option<UserId>,
    /// Contact email.
    pub email: String,
    /// Personal or company account.
    pub tipo_cuenta: AccountType,
    /// Company permission.
    pub permiso: Option<Permission>,
    /// Company name.
    pub empresa: Option<String>,
    /// Shared company workspace.
    pub estructura_empresa_id: Option<WorkspaceId>,
    /// Subscription plan name.
    pub subscription_plan: String,
}

impl NewUser {
    /// Materialize the account row.
    pub fn into_account(self) -> UserAccount {
        UserAccount {
            id: self.id.unwrap_or_default(),
            email: self.email,
            tipo_cuenta: self.tipo_cuenta,
            permiso: self.permiso,
            empresa: self.empresa,
            estructura_empresa_id: self.estructura_empresa_id,
            subscription_plan: self.subscription_plan,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(permiso: Option<Permission>) -> UserAccount {
        NewUser {
            id: None,
            email: "ana@example.com".into(),
            tipo_cuenta: AccountType::Empresa,
            permiso,
            empresa: Some("Acme".into()),
            estructura_empresa_id: Some(WorkspaceId::new()),
            subscription_plan: "plan3".into(),
        }
        .into_account()
    }

    #[test]
    fn test_company_permissions() {
        let admin = member(Some(Permission::Admin));
        assert!(admin.is_admin() && admin.can_manage_folders() && admin.can_assign_agents());

        let editor = member(Some(Permission::Edicion));
        assert!(!editor.can_manage_folders());
        assert!(editor.can_assign_agents());

        let reader = member(Some(Permission::Lectura));
        assert!(!reader.can_assign_agents());
    }

    #[test]
    fn test_company_members_share_workspace() {
        let admin = member(Some(Permission::Admin));
        assert_eq!(Some(admin.workspace_id()), admin.estructura_empresa_id);
    }

    #[test]
    fn test_individual_owns_workspace() {
        let mut user = member(None);
        user.tipo_cuenta = AccountType::Individual;
        assert_eq!(user.workspace_id().into_uuid(), user.id.into_uuid());
        assert!(user.can_manage_folders());
        assert!(!user.can_edit_empresa());
    }
}
