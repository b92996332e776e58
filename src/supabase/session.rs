//! Persisted auth session.
//!
//! The session is stored as JSON under `sb-<project ref>-auth-token`, the
//! same key the JavaScript client uses, so a token written by another
//! client for the same project is picked up as-is.

use serde::{Deserialize, Serialize};

use crate::storage::{SessionStorage, StorageError};

/// Tokens this close to expiry are treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Unix seconds. Sessions without an expiry never expire locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, token_type: None, expires_at: None, user: None }
    }

    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now + EXPIRY_MARGIN_SECS)
    }
}

#[must_use]
pub fn storage_key(project_ref: &str) -> String {
    format!("sb-{project_ref}-auth-token")
}

/// Load the stored session. A value that does not decode is removed.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn load(storage: &dyn SessionStorage, key: &str) -> Result<Option<Session>, StorageError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable session");
            storage.remove_item(key)?;
            Ok(None)
        }
    }
}

/// # Errors
///
/// Returns an error if the session cannot be encoded or written.
pub fn save(storage: &dyn SessionStorage, key: &str, session: &Session) -> Result<(), StorageError> {
    let raw = serde_json::to_string(session)?;
    storage.set_item(key, &raw)
}

#[must_use]
pub fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
