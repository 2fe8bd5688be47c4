//! Reply verification schema and report types.
//!
//! Model replies are untrusted input. Before any field of a JSON reply is
//! exposed to the caller, the verifier runs it against a `ReplySchema`.
//! Only a passing `VerificationReport` lets the typed report through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the verifier checks a JSON reply against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySchema {
    /// Unique identifier for this schema (e.g. "code-audit-v1").
    pub schema_id: String,
    /// A JSON Schema document used for structural validation.
    ///
    /// The same document is sent to the model as its output constraint.
    pub json_schema: Value,
    /// Additional rules evaluated after structural validation.
    pub rules: Vec<VerificationRule>,
}

/// A single verification rule applied to a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Unique identifier for this rule, referenced in failure reports.
    pub rule_id: String,
    /// Human-readable description for logs.
    pub description: String,
    /// The verification logic to apply.
    pub rule_type: VerificationRuleType,
}

/// The kinds of semantic checks the verifier supports.
///
/// Field paths are dotted (`"findings.title"`). A `*` segment fans out over
/// every element of an array, so `"vulnerabilities.*.severity"` addresses
/// the severity of each vulnerability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// Every value at `field_path` must be present and non-null.
    RequiredField { field_path: String },

    /// Every value at `field_path` must equal one of `allowed`.
    AllowedValues {
        field_path: String,
        allowed: Vec<Value>,
    },

    /// Every value at `field_path` must be a number within `[min, max]`.
    NumericRange {
        field_path: String,
        min: f64,
        max: f64,
    },
}

/// The result of running a `ReplySchema` against a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every check passed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// Join all failure messages into one line for logging.
    pub fn describe_failures(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single rule failure within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// The `rule_id` of the rule that failed, or `"json-schema"`.
    pub rule_id: String,
    pub message: String,
}
