//! # ciphersync-dashboard
//!
//! The tool workflows of the CipherSync security dashboard.
//!
//! Each workflow wires the adapter, the local analyzers, and the history
//! store together:
//!
//! 1. **Code audit**: schema-constrained vulnerability report, recorded as `CODE`.
//! 2. **Cloud audit**: scored misconfiguration review, recorded as `CLOUD`.
//! 3. **Intel scan**: URL, username, or breach reconnaissance, recorded as
//!    `URL`, `OSINT`, or `BREACH`.
//! 4. **Password check**: local strength estimate, recorded as `PASSWORD`
//!    by fingerprint only.
//! 5. **SOC chat**: conversational, not recorded.

pub mod dashboard;
pub mod password;
pub mod soc_chat;

pub use dashboard::{intel_audit_kind, Dashboard, DashboardStatus, Recorded};
pub use password::{PasswordReport, Strength};
pub use soc_chat::SocChat;

// ── Tests ─────────────────────────────────────────────────────────────────────
