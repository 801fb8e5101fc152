//! Client configuration.
//!
//! The backend base URL is resolved from, in order: an explicit value, the
//! `WELLBEING_API_URL` environment variable, the workspace settings file at
//! `.wellbeing/settings.json`, and finally the local development default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ChatError, ChatResult};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "WELLBEING_API_URL";

/// Settings file relative to the workspace root
pub const SETTINGS_PATH: &str = ".wellbeing/settings.json";

/// Connection settings for the assistant backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base location of the chat, reset and health endpoints
    pub base_url: Url,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

/// On-disk settings file
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(rename = "apiBaseUrl")]
    api_base_url: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for an explicit base URL
    pub fn new(base_url: &str) -> ChatResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            user_agent: format!("wellbeing-chat/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Create a configuration from environment variables
    pub fn from_env() -> ChatResult<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(BASE_URL_ENV) {
            Some(value) if !value.trim().is_empty() => Self::new(value.trim()).map(Some),
            _ => Ok(None),
        }
    }

    /// Create a configuration from the workspace settings file, if present
    pub fn from_settings(workspace_root: &Path) -> ChatResult<Option<Self>> {
        let settings_path = workspace_root.join(SETTINGS_PATH);
        if !settings_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&settings_path)?;
        let settings: SettingsFile = serde_json::from_str(&content)?;

        match settings.api_base_url {
            Some(url) => {
                debug!(path = %settings_path.display(), "Loaded base URL from settings");
                Self::new(&url).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve the configuration using every source in priority order
    pub fn load(explicit: Option<&str>, workspace_root: &Path) -> ChatResult<Self> {
        if let Some(url) = explicit {
            return Self::new(url);
        }
        if let Some(config) = Self::from_env()? {
            return Ok(config);
        }
        if let Some(config) = Self::from_settings(workspace_root)? {
            return Ok(config);
        }
        Ok(Self::default())
    }

    /// Full URL of an endpoint below the base
    pub fn endpoint(&self, path: &str) -> ChatResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `host:port` of the backend, as shown to users
    pub fn location(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("localhost");
        match self.base_url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: parse_base_url(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: format!("wellbeing-chat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// Base URLs always end in `/` so `join` appends instead of replacing the last segment.
fn parse_base_url(raw: &str) -> ChatResult<Url> {
    let mut url = Url::parse(raw.trim())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ChatError::Config(format!(
            "unsupported scheme '{}' in base URL {}",
            url.scheme(),
            raw
        )));
    }
    if url.host_str().is_none() {
        return Err(ChatError::Config(format!("base URL has no host: {}", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
