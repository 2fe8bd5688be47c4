//! The reply schemas of the two structured tools.
//!
//! Each schema is used twice: the JSON Schema document is sent to the model
//! as its output constraint, and the full `ReplySchema` is what the verifier
//! checks the reply against before it is deserialized.

use serde_json::json;

use crate::{
    report::Severity,
    verify::{ReplySchema, VerificationRule, VerificationRuleType},
};

pub const CODE_AUDIT_SCHEMA_ID: &str = "code-audit-v1";
pub const CLOUD_AUDIT_SCHEMA_ID: &str = "cloud-audit-v1";

/// Schema for `CodeAuditReport` replies.
pub fn code_audit_schema() -> ReplySchema {
    ReplySchema {
        schema_id: CODE_AUDIT_SCHEMA_ID.to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "vulnerabilities": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "severity": { "type": "string", "enum": (Severity::LABELS) },
                            "impact": { "type": "string" },
                            "fixSnippet": { "type": "string" }
                        },
                        "required": ["title", "severity", "impact", "fixSnippet"]
                    }
                },
                "summary": { "type": "string" },
                "fullRemediatedCode": { "type": "string" }
            },
            "required": ["vulnerabilities", "summary", "fullRemediatedCode"]
        }),
        rules: vec![VerificationRule {
            rule_id: "severity-scale".to_string(),
            description: "Every vulnerability uses the CRITICAL/WARNING/INFO scale".to_string(),
            rule_type: VerificationRuleType::AllowedValues {
                field_path: "vulnerabilities.*.severity".to_string(),
                allowed: Severity::LABELS.iter().map(|s| json!(s)).collect(),
            },
        }],
    }
}

/// Schema for `CloudAuditReport` replies.
pub fn cloud_audit_schema() -> ReplySchema {
    ReplySchema {
        schema_id: CLOUD_AUDIT_SCHEMA_ID.to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "score": { "type": "number" },
                "findings": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "severity": { "type": "string" },
                            "blastRadius": { "type": "string" },
                            "remediation": { "type": "string" }
                        },
                        "required": ["title", "severity", "blastRadius", "remediation"]
                    }
                },
                "summary": { "type": "string" }
            },
            "required": ["score", "findings", "summary"]
        }),
        rules: vec![VerificationRule {
            rule_id: "score-range".to_string(),
            description: "The compliance score lies within 0..=100".to_string(),
            rule_type: VerificationRuleType::NumericRange {
                field_path: "score".to_string(),
                min: 0.0,
                max: 100.0,
            },
        }],
    }
}
