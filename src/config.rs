use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://mailsync.l4it.net";

/// What a failed fetch leaves in the task cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Keep whatever the cache held before the failure.
    UseLastGoodCache,
    /// Replace the list with the built-in placeholder task.
    UseBuiltInSample,
    /// Clear the list and hand the error back to the caller.
    Propagate,
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("mailsync")
        .join("config.json")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_list_policy() -> ErrorPolicy {
    ErrorPolicy::UseBuiltInSample
}

fn default_search_policy() -> ErrorPolicy {
    ErrorPolicy::Propagate
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct MailSyncConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Applies to listing and refresh.
    #[serde(default = "default_list_policy")]
    pub list_error_policy: ErrorPolicy,
    #[serde(default = "default_search_policy")]
    pub search_error_policy: ErrorPolicy,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for MailSyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_error_policy: default_list_policy(),
            search_error_policy: default_search_policy(),
            debug_logging: false,
            request_timeout_secs: None,
        }
    }
}

impl MailSyncConfig {
    pub fn path() -> PathBuf {
        default_config_path()
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("No config at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
