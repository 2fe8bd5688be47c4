//! Configuration schema.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration.
//!
//! Example:
//! ```toml
//! [model]
//! name = "gemini-3-flash-preview"
//! api_key_env = "API_KEY"
//! request_timeout_secs = 60
//!
//! [history]
//! dir = ".ciphersync"
//! capacity = 100
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ciphersync_contracts::audit::{HISTORY_CAPACITY, HISTORY_STORAGE_KEY};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_HISTORY_DIR: &str = ".ciphersync";

/// Which model to call and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Model identifier sent with every request.
    pub name: String,

    /// Base URL of the `generateContent` endpoint, without the model.
    pub base_url: String,

    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    pub api_key_env: String,

    /// Per-request HTTP timeout. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Where and how much audit history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    /// Directory holding the history file.
    pub dir: PathBuf,

    /// Storage key; the file is `<dir>/<storage_key>.json`.
    pub storage_key: String,

    /// Maximum retained results. Must be at least 1.
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            storage_key: HISTORY_STORAGE_KEY.to_string(),
            capacity: HISTORY_CAPACITY,
        }
    }
}

/// The top-level structure deserialized from `ciphersync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub model: ModelSettings,
    pub history: HistorySettings,
}
