//! Typed reports produced by the schema-constrained tools.
//!
//! Field names follow the JSON the model is asked to emit (camelCase), so
//! a validated reply deserializes straight into these types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary text of the code-audit fallback report.
pub const PARSING_ERROR_SUMMARY: &str = "Parsing Error";

/// Summary text of the cloud-audit fallback report.
pub const ANALYSIS_FAILED_SUMMARY: &str = "Analysis Failed";

/// Severity of a code-audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub const LABELS: [&'static str; 3] = ["CRITICAL", "WARNING", "INFO"];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vulnerability found by the code auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub title: String,
    pub severity: Severity,
    pub impact: String,
    pub fix_snippet: String,
}

/// Result of a static-analysis pass over a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAuditReport {
    pub vulnerabilities: Vec<Vulnerability>,
    pub summary: String,
    /// The complete input file with every suggested patch applied.
    pub full_remediated_code: String,
}

impl CodeAuditReport {
    /// The report returned when the model's reply cannot be used.
    ///
    /// Echoes the original input back as the "remediated" code so the caller
    /// always has a well-formed report to render.
    pub fn parsing_error(original: impl Into<String>) -> Self {
        Self {
            vulnerabilities: Vec::new(),
            summary: PARSING_ERROR_SUMMARY.to_string(),
            full_remediated_code: original.into(),
        }
    }

    /// Count findings at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.vulnerabilities
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

/// One misconfiguration found by the cloud reviewer.
///
/// Severity is free text here: cloud findings use whatever scale the model
/// picks (HIGH, MEDIUM, ...), and the reviewer never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFinding {
    pub title: String,
    pub severity: String,
    pub blast_radius: String,
    pub remediation: String,
}

/// Result of reviewing an infrastructure configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAuditReport {
    /// 0–100 compliance score.
    pub score: f64,
    pub findings: Vec<CloudFinding>,
    pub summary: String,
}

impl CloudAuditReport {
    /// The report returned when the model's reply cannot be used.
    pub fn analysis_failed() -> Self {
        Self {
            score: 0.0,
            findings: Vec::new(),
            summary: ANALYSIS_FAILED_SUMMARY.to_string(),
        }
    }
}

/// The reconnaissance modes of the intel scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntelKind {
    /// Reputation and phishing analysis of a URL.
    Url,
    /// Open-source footprint of a username or handle.
    User,
    /// Known breach exposure of an email or identifier.
    Breach,
}

impl IntelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntelKind::Url => "URL",
            IntelKind::User => "USER",
            IntelKind::Breach => "BREACH",
        }
    }
}

impl fmt::Display for IntelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
