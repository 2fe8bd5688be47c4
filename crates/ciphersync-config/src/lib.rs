//! # ciphersync-config
//!
//! TOML configuration for CipherSync.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ciphersync_config::Settings;
//!
//! let settings = Settings::load(None)?;         // ./ciphersync.toml or defaults
//! let api_key = settings.api_key()?;            // from $API_KEY by default
//! ```

pub mod loader;
pub mod settings;

pub use loader::DEFAULT_CONFIG_FILE;
pub use settings::{HistorySettings, ModelSettings, Settings};

// ── Tests ─────────────────────────────────────────────────────────────────────
