//! Account type and company permission enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an account is personal or belongs to a company workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A personal account owning its own folder structure.
    #[default]
    Individual,
    /// A member of a company sharing one folder structure.
    Empresa,
}

impl AccountType {
    /// Return the account type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Empresa => "empresa",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = papyrus_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "empresa" => Ok(Self::Empresa),
            _ => Err(papyrus_core::AppError::validation(format!(
                "Invalid account type: '{s}'. Expected one of: individual, empresa"
            ))),
        }
    }
}

/// Permission level of a company member.
///
/// Ordered by privilege: Admin > Edicion > Lectura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "permission_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Manages the folder structure and everything below it.
    Admin,
    /// Assigns agents and edits the catalog.
    Edicion,
    /// Read-only access.
    Lectura,
}

impl Permission {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Edicion => 2,
            Self::Lectura => 1,
        }
    }

    /// Check if this permission has at least the given one's privileges.
    pub fn has_at_least(&self, other: &Permission) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Edicion => "edicion",
            Self::Lectura => "lectura",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = papyrus_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "edicion" | "edición" => Ok(Self::Edicion),
            "lectura" => Ok(Self::Lectura),
            _ => Err(papyrus_core::AppError::validation(format!(
                "Invalid permission: '{s}'. Expected one of: admin, edicion, lectura"
            ))),
        }
    }
}
