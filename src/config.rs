//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Only two values are required: the project URL and its anonymous API key.
//! Both also accept the `EXPO_PUBLIC_*` names used by the mobile build so a
//! shared `.env` file works for either client. Parsing goes through a lookup
//! closure so tests never touch the process environment.

use std::path::PathBuf;

use reqwest::Url;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const URL_VARS: [&str; 2] = ["SUPABASE_URL", "EXPO_PUBLIC_supabaseUrl_key"];
pub const ANON_KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "EXPO_PUBLIC_supabaseAnonKey_api"];

const STORAGE_DIR_VAR: &str = "ROLL_CALL_STORAGE_DIR";
const REQUEST_TIMEOUT_VAR: &str = "ROLL_CALL_REQUEST_TIMEOUT_SECS";
const CONNECT_TIMEOUT_VAR: &str = "ROLL_CALL_CONNECT_TIMEOUT_SECS";

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required value is absent or empty.
    #[error("missing config: env var {var} not set")]
    Missing { var: &'static str },

    /// The service URL is not an absolute http(s) URL with a host.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// No platform config directory and no explicit storage directory.
    #[error("no config directory available; set ROLL_CALL_STORAGE_DIR")]
    NoStorageDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Session handling switches handed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthOptions {
    pub persist_session: bool,
    pub auto_refresh_token: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self { persist_session: true, auto_refresh_token: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: String,
    pub anon_key: String,
    pub project_ref: String,
    pub storage_dir: PathBuf,
    pub auth: AuthOptions,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build a config from explicit values with default auth options and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the anon key is empty.
    pub fn new(url: &str, anon_key: &str, storage_dir: PathBuf) -> Result<Self, ConfigError> {
        let (url, project_ref) = normalize_url(url)?;
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing { var: ANON_KEY_VARS[0] });
        }
        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
            project_ref,
            storage_dir,
            auth: AuthOptions::default(),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL` (or `EXPO_PUBLIC_supabaseUrl_key`)
    /// - `SUPABASE_ANON_KEY` (or `EXPO_PUBLIC_supabaseAnonKey_api`)
    ///
    /// Optional:
    /// - `ROLL_CALL_STORAGE_DIR`: default `<config dir>/roll-call`
    /// - `ROLL_CALL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ROLL_CALL_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or the URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a caller-supplied lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or the URL is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = first_present(&lookup, &URL_VARS).ok_or(ConfigError::Missing { var: URL_VARS[0] })?;
        let anon_key =
            first_present(&lookup, &ANON_KEY_VARS).ok_or(ConfigError::Missing { var: ANON_KEY_VARS[0] })?;
        let storage_dir = match first_present(&lookup, &[STORAGE_DIR_VAR]) {
            Some(dir) => PathBuf::from(dir),
            None => default_storage_dir()?,
        };

        let mut config = Self::new(&url, &anon_key, storage_dir)?;
        config.timeouts = Timeouts {
            request_secs: parse_u64(&lookup, REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(config)
    }
}

fn first_present(lookup: &impl Fn(&str) -> Option<String>, vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| lookup(var))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Validate the service URL and return it without a trailing slash, along
/// with the project ref (first label of the host).
fn normalize_url(raw: &str) -> Result<(String, String), ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!("{trimmed}: scheme must be http or https")));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!("{trimmed}: query and fragment are not allowed")));
    }
    let Some(host) = parsed.host_str() else {
        return Err(ConfigError::InvalidUrl(format!("{trimmed}: missing host")));
    };
    let project_ref = host.split('.').next().unwrap_or(host).to_string();
    Ok((trimmed.to_string(), project_ref))
}

fn default_storage_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("roll-call"))
        .ok_or(ConfigError::NoStorageDir)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
