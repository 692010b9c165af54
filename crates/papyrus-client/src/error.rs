//! Errors raised while talking to the remote folder store.

use thiserror::Error;

/// Result alias for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The server rejected the call because the structure version moved.
    #[error("version conflict (current {current_version:?}): {message}")]
    Conflict {
        /// Version the server holds, when reported.
        current_version: Option<u64>,
        /// Server message.
        message: String,
    },
    /// Non-2xx response without a conflict marker.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Server message or raw body.
        message: String,
    },
    /// The request could not be sent.
    #[error("request failed: {0}")]
    Request(String),
    /// The response body was not what the client expected.
    #[error("invalid response: {0}")]
    Decode(String),
    /// No response within the configured deadline.
    #[error("request timed out")]
    Timeout,
}

impl RemoteError {
    /// Whether this is an optimistic-concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Message suitable for logs.
    pub fn server_message(&self) -> String {
        match self {
            Self::Conflict { message, .. } | Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Map a non-2xx response body to an error.
///
/// A body with `conflict: true` is a conflict whatever the status.
pub fn error_from_body(status: u16, body: &[u8]) -> RemoteError {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let raw = String::from_utf8_lossy(body).trim().to_string();
            if raw.is_empty() { "<empty>".to_string() } else { raw }
        });

    let conflict = parsed
        .as_ref()
        .and_then(|v| v.get("conflict"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if conflict {
        let current_version = parsed
            .as_ref()
            .and_then(|v| v.get("currentVersion"))
            .and_then(|v| v.as_u64());
        RemoteError::Conflict {
            current_version,
            message,
        }
    } else {
        RemoteError::Http { status, message }
    }
}
