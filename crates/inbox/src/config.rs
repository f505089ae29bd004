//! Configuration loading for the inbox engine
//!
//! Settings are resolved in order of priority:
//! 1. `INBOX_*` environment variables, field by field
//! 2. An explicit JSON file path, or else `inbox.json` in the config
//!    directory (~/.config/inbox/)
//! 3. Built-in defaults for anything neither sets

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::MailApiClient;

/// Config filename in the inbox config directory
const CONFIG_FILE: &str = "inbox.json";

/// Override database filename in the inbox data directory
const DATABASE_FILE: &str = "overrides.sqlite";

/// Settings for the inbox engine and its driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// Base URL of the paginated mail API
    pub api_url: String,
    /// Override database path; `None` uses the data directory
    pub database_path: Option<PathBuf>,
    /// Per-request timeout in seconds; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Page shown when a session starts
    pub start_page: u32,
    /// Report failed and empty page fetches with the same message
    pub conflate_list_errors: bool,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            api_url: MailApiClient::DEFAULT_BASE_URL.to_string(),
            database_path: None,
            request_timeout_secs: None,
            start_page: 1,
            conflate_list_errors: true,
        }
    }
}

impl InboxConfig {
    /// Load settings, preferring `explicit_path` when given
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let base = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None if config::config_exists(CONFIG_FILE) => {
                config::load_json(CONFIG_FILE).context("Failed to load inbox.json")?
            }
            None => Self::default(),
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse inbox config JSON")
    }

    /// Apply `INBOX_*` variables looked up through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("INBOX_API_URL") {
            debug!("INBOX_API_URL overrides api_url");
            self.api_url = url;
        }
        if let Some(path) = lookup("INBOX_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("INBOX_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .with_context(|| format!("INBOX_TIMEOUT_SECS is not a number: {}", secs))?;
            self.request_timeout_secs = Some(secs);
        }
        if let Some(flag) = lookup("INBOX_CONFLATE_ERRORS") {
            self.conflate_list_errors = parse_bool(&flag)
                .with_context(|| format!("INBOX_CONFLATE_ERRORS is not a boolean: {}", flag))?;
        }
        Ok(self)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Resolved override database path
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(|| config::data_path(DATABASE_FILE))
    }

    /// Default config file path (~/.config/inbox/inbox.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }

    /// Write these settings to the default config file
    pub fn save(&self) -> Result<()> {
        config::save_json(CONFIG_FILE, self).context("Failed to save inbox.json")
    }

    /// Write these settings to a specific JSON file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        config::save_json_file(path, self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
