//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::net::api::{ApiConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelveConfig {
    pub api: ApiConfig,
    /// Directory holding persisted client state.
    pub state_dir: PathBuf,
}

impl ShelveConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SHELVE_API_BASE_URL`: default `http://localhost:8080`
    /// - `SHELVE_STATE_DIR`: default `$XDG_STATE_HOME/shelve`, then
    ///   `$HOME/.local/state/shelve`, then `./.shelve`
    /// - `SHELVE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SHELVE_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("SHELVE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api = ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: env_parse_u64("SHELVE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("SHELVE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let state_dir = std::env::var_os("SHELVE_STATE_DIR").map_or_else(default_state_dir, PathBuf::from);
        Self { api, state_dir }
    }

    /// Override the gateway base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn default_state_dir() -> PathBuf {
    state_dir_from(std::env::var_os("XDG_STATE_HOME"), std::env::var_os("HOME"))
}

fn state_dir_from(xdg_state_home: Option<std::ffi::OsString>, home: Option<std::ffi::OsString>) -> PathBuf {
    if let Some(xdg) = xdg_state_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("shelve");
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("state").join("shelve");
    }
    PathBuf::from(".shelve")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
