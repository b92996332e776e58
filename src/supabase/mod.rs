//! Supabase client handle.
//!
//! DESIGN
//! ======
//! Covers only what the attendance screen uses: PostgREST selects with
//! equality filters, authenticated with the anon key or a persisted user
//! session. Sign-in and token refresh grants stay with the hosted auth
//! service; an expired session is dropped and requests fall back to the
//! anon key.
//!
//! ERROR HANDLING
//! ==============
//! PostgREST error bodies (`{message, code, details, hint}`) are surfaced
//! as [`ClientError::Api`] whose display is just the service's message, so
//! the screen can show it verbatim.

pub mod query;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AuthOptions, ClientConfig};
use crate::storage::{SessionStorage, StorageError};
pub use query::QueryBuilder;
pub use session::Session;

/// Errors produced by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request URL could not be built from the table and filters.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request did not complete.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// Session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    auth: AuthOptions,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
}

impl SupabaseClient {
    /// Build a client handle for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url),
            anon_key: config.anon_key.clone(),
            auth: config.auth,
            storage,
            storage_key: session::storage_key(&config.project_ref),
        })
    }

    /// Start a query against `table`. Selects all columns unless narrowed.
    #[must_use]
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Persist `session` so later requests are made as that user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn set_session(&self, session: &Session) -> Result<(), ClientError> {
        session::save(self.storage.as_ref(), &self.storage_key, session)?;
        tracing::info!(key = %self.storage_key, "session stored");
        Ok(())
    }

    /// Forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be removed.
    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.storage.remove_item(&self.storage_key)?;
        tracing::info!(key = %self.storage_key, "session removed");
        Ok(())
    }

    /// Token for the `Authorization` header of the next request.
    fn bearer_token(&self) -> String {
        if !self.auth.persist_session {
            return self.anon_key.clone();
        }
        let stored = match session::load(self.storage.as_ref(), &self.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; using anon key");
                None
            }
        };
        let now = session::now_unix();
        if let Some(expired) = stored.as_ref().filter(|s| s.is_expired(now)) {
            tracing::warn!(expires_at = ?expired.expires_at, "stored session expired");
            if self.auth.auto_refresh_token {
                if let Err(e) = self.storage.remove_item(&self.storage_key) {
                    tracing::warn!(error = %e, "failed to remove expired session");
                }
            }
        }
        select_bearer(&self.anon_key, stored.as_ref(), now).to_string()
    }
}

/// Pick the session's access token when it is usable, else the anon key.
fn select_bearer<'a>(anon_key: &'a str, session: Option<&'a Session>, now: i64) -> &'a str {
    match session {
        Some(s) if !s.is_expired(now) && !s.access_token.is_empty() => &s.access_token,
        _ => anon_key,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
