//! Audit history record types.
//!
//! `AuditResult` is what the history vault stores, one per completed tool
//! run. `AuditDraft` is what a tool hands to the vault: everything except
//! the `id` and `timestamp`, which the vault assigns at insertion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key the audit history blob lives under.
pub const HISTORY_STORAGE_KEY: &str = "ciphersync_audit_vault";

/// Maximum number of audit results the history retains.
pub const HISTORY_CAPACITY: usize = 100;

/// Which tool produced an audit result.
///
/// Serialized in upper case (`"CODE"`, `"CLOUD"`, ...) to stay compatible
/// with history blobs written by earlier versions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditKind {
    Code,
    Cloud,
    Osint,
    Url,
    Breach,
    Password,
}

impl AuditKind {
    /// Every kind, in display order.
    pub const ALL: [AuditKind; 6] = [
        AuditKind::Code,
        AuditKind::Cloud,
        AuditKind::Osint,
        AuditKind::Url,
        AuditKind::Breach,
        AuditKind::Password,
    ];

    /// The wire label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            AuditKind::Code => "CODE",
            AuditKind::Cloud => "CLOUD",
            AuditKind::Osint => "OSINT",
            AuditKind::Url => "URL",
            AuditKind::Breach => "BREACH",
            AuditKind::Password => "PASSWORD",
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded outcome of a security tool invocation.
///
/// Once inserted into the vault an `AuditResult` is never edited; the only
/// mutation the vault supports on an entry is removing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Short token unique within the vault (e.g. `CS-3fa85f64`).
    pub id: String,
    /// Human-readable creation time, assigned at insertion.
    pub timestamp: String,
    /// The tool that produced this result.
    #[serde(rename = "type")]
    pub kind: AuditKind,
    /// The input or subject that was analyzed.
    pub content: String,
    /// Short human-readable outcome.
    pub summary: String,
    /// 0–100 risk or compliance score, only for tools that produce one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Suggested fix text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

/// An audit result before the vault has stamped it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub kind: AuditKind,
    pub content: String,
    pub summary: String,
    pub score: Option<f64>,
    pub remediation: Option<String>,
}

impl AuditDraft {
    /// A draft with no score and no remediation.
    pub fn new(kind: AuditKind, content: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            summary: summary.into(),
            score: None,
            remediation: None,
        }
    }

    /// Attach a score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Attach remediation text. Blank text is ignored.
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        let remediation = remediation.into();
        if !remediation.trim().is_empty() {
            self.remediation = Some(remediation);
        }
        self
    }

    /// Stamp the draft with its vault-assigned identity.
    pub fn into_result(self, id: String, timestamp: String) -> AuditResult {
        AuditResult {
            id,
            timestamp,
            kind: self.kind,
            content: self.content,
            summary: self.summary,
            score: self.score,
            remediation: self.remediation,
        }
    }
}
