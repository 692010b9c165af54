//! Permission summary handed to clients.

use serde::{Deserialize, Serialize};

use papyrus_core::types::WorkspaceId;

use super::account::{AccountType, Permission};
use super::model::UserAccount;

/// What the UI needs to gate its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Account type.
    #[serde(default)]
    pub tipo_cuenta: AccountType,
    /// Company permission.
    #[serde(default)]
    pub permiso: Option<Permission>,
    /// Company name.
    #[serde(default)]
    pub empresa: Option<String>,
    /// Shared company workspace.
    #[serde(default)]
    pub estructura_empresa_id: Option<WorkspaceId>,
    /// Company member with admin or edicion rights.
    #[serde(default)]
    pub can_edit_empresa: bool,
    /// Company admin.
    #[serde(default)]
    pub is_admin: bool,
}

impl UserContext {
    /// Whether the account belongs to a company.
    pub fn is_empresa(&self) -> bool {
        self.tipo_cuenta == AccountType::Empresa
    }

    /// Drag handles and the folder menu are shown.
    pub fn can_drag(&self) -> bool {
        self.can_edit_empresa || !self.is_empresa()
    }

    /// The new-folder control is enabled.
    pub fn can_create_folder(&self) -> bool {
        !self.is_empresa() || self.is_admin
    }
}

impl From<&UserAccount> for UserContext {
    fn from(user: &UserAccount) -> Self {
        Self {
            tipo_cuenta: user.tipo_cuenta,
            permiso: user.permiso,
            empresa: user.empresa.clone(),
            estructura_empresa_id: user.estructura_empresa_id,
            can_edit_empresa: user.can_edit_empresa(),
            is_admin: user.is_admin(),
        }
    }
}
