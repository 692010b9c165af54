//! Request context carrying the resolved account of the caller.

use chrono::{DateTime, Utc};

use papyrus_core::types::{UserId, WorkspaceId};
use papyrus_entity::user::UserAccount;

/// Context for the current request.
///
/// Built by the API extractor once the caller's account is loaded and
/// passed into service methods so every operation knows who is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The caller's account.
    pub user: UserAccount,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user: UserAccount) -> Self {
        Self {
            user,
            request_time: Utc::now(),
        }
    }

    /// The caller's user id.
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// The workspace the caller operates on.
    pub fn workspace_id(&self) -> WorkspaceId {
        self.user.workspace_id()
    }

    /// Identifier stamped into folder audit fields.
    pub fn actor(&self) -> String {
        self.user.email.clone()
    }
}
