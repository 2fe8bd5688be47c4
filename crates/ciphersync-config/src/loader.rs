//! Loading and validating `Settings`.
//!
//! Construct via `from_toml_str`, `from_file`, or `load`. Every constructor
//! validates before returning, so a `Settings` in hand is always usable.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, info};

use ciphersync_contracts::error::{CipherError, CipherResult};

use crate::settings::Settings;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "ciphersync.toml";

impl Settings {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `CipherError::Config` if the TOML is malformed, names an
    /// unknown field, or fails validation.
    pub fn from_toml_str(s: &str) -> CipherResult<Self> {
        let settings: Settings = toml::from_str(s).map_err(|e| CipherError::Config {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read the file at `path` and parse it as configuration.
    pub fn from_file(path: &Path) -> CipherResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CipherError::Config {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        let settings = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), model = %settings.model.name, "configuration loaded");
        Ok(settings)
    }

    /// Load from `path` if given (it must exist), else from
    /// `ciphersync.toml` in the working directory if present, else defaults.
    pub fn load(path: Option<&Path>) -> CipherResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(&fallback)
                } else {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> CipherResult<()> {
        let fail = |reason: String| Err(CipherError::Config { reason });

        if self.model.name.trim().is_empty() {
            return fail("model.name must not be empty".to_string());
        }
        if self.model.api_key_env.trim().is_empty() {
            return fail("model.api_key_env must not be empty".to_string());
        }
        if self.model.request_timeout_secs == Some(0) {
            return fail("model.request_timeout_secs must be at least 1 when set".to_string());
        }
        if self.history.capacity == 0 {
            return fail("history.capacity must be at least 1".to_string());
        }
        let key = &self.history.storage_key;
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return fail(format!(
                "history.storage_key '{key}' may only contain letters, digits, '_' and '-'"
            ));
        }
        Ok(())
    }

    /// The API key from the configured environment variable.
    pub fn api_key(&self) -> CipherResult<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    /// The API key, resolving the variable through `lookup`.
    pub fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> CipherResult<String> {
        let name = &self.model.api_key_env;
        match lookup(name) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(CipherError::Config {
                reason: format!("API key not found: set the {name} environment variable"),
            }),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.model.request_timeout_secs.map(Duration::from_secs)
    }
}
