//! Schema-based reply verifier.
//!
//! `SchemaVerifier` implements the `ReplyVerifier` trait from
//! `ciphersync-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the reply is validated against
//!    `ReplySchema::json_schema` using the `jsonschema` crate.
//! 2. **Semantic**: each `VerificationRule` in `ReplySchema::rules` is
//!    evaluated in order. All failures are collected before returning.

use serde_json::Value;
use tracing::{debug, warn};

use ciphersync_contracts::{
    error::CipherResult,
    verify::{ReplySchema, VerificationFailure, VerificationReport, VerificationRuleType},
};
use ciphersync_core::traits::ReplyVerifier;

/// Rule id attached to structural failures.
pub const JSON_SCHEMA_RULE_ID: &str = "json-schema";

/// The CipherSync reply verifier.
#[derive(Debug, Default)]
pub struct SchemaVerifier;

impl SchemaVerifier {
    pub fn new() -> Self {
        Self
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Resolve a dotted path against `value`, fanning out at `*` segments.
    ///
    /// Returns one slot per addressed leaf: `Some` for a present, non-null
    /// value and `None` for a missing or null one. A `*` over an empty array
    /// addresses no leaves at all.
    fn resolve_path<'v>(value: &'v Value, path: &str) -> Vec<Option<&'v Value>> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut leaves = Vec::new();
        Self::collect(value, &segments, &mut leaves);
        leaves
    }

    fn collect<'v>(value: &'v Value, segments: &[&str], out: &mut Vec<Option<&'v Value>>) {
        let Some((head, rest)) = segments.split_first() else {
            out.push(if value.is_null() { None } else { Some(value) });
            return;
        };

        if *head == "*" {
            match value.as_array() {
                Some(items) => {
                    for item in items {
                        Self::collect(item, rest, out);
                    }
                }
                None => out.push(None),
            }
            return;
        }

        match value.get(*head) {
            Some(child) if !child.is_null() => Self::collect(child, rest, out),
            _ => out.push(None),
        }
    }

    fn check_rule(reply: &Value, rule_type: &VerificationRuleType) -> Option<String> {
        match rule_type {
            // ── RequiredField ─────────────────────────────────────────────
            VerificationRuleType::RequiredField { field_path } => {
                if Self::resolve_path(reply, field_path).iter().any(Option::is_none) {
                    Some(format!("required field '{field_path}' is missing or null"))
                } else {
                    None
                }
            }

            // ── AllowedValues ─────────────────────────────────────────────
            VerificationRuleType::AllowedValues { field_path, allowed } => {
                Self::resolve_path(reply, field_path)
                    .into_iter()
                    .find_map(|leaf| match leaf {
                        None => Some(format!(
                            "field '{field_path}' is missing; cannot check allowed values"
                        )),
                        Some(actual) if !allowed.contains(actual) => Some(format!(
                            "field '{field_path}' has value {actual} which is not in the allowed set"
                        )),
                        Some(_) => None,
                    })
            }

            // ── NumericRange ──────────────────────────────────────────────
            VerificationRuleType::NumericRange { field_path, min, max } => {
                Self::resolve_path(reply, field_path)
                    .into_iter()
                    .find_map(|leaf| match leaf.map(Value::as_f64) {
                        None => Some(format!("field '{field_path}' is missing")),
                        Some(None) => Some(format!("field '{field_path}' is not a number")),
                        Some(Some(n)) if n < *min || n > *max => Some(format!(
                            "field '{field_path}' has value {n} outside {min}..={max}"
                        )),
                        Some(Some(_)) => None,
                    })
            }
        }
    }
}

impl ReplyVerifier for SchemaVerifier {
    fn verify(&self, reply: &Value, schema: &ReplySchema) -> CipherResult<VerificationReport> {
        let mut failures: Vec<VerificationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        // A null json_schema means "no structural constraint".
        if !schema.json_schema.is_null() {
            match jsonschema::validator_for(&schema.json_schema) {
                Ok(validator) => {
                    for error in validator.iter_errors(reply) {
                        let message = format!(
                            "JSON Schema violation at {}: {}",
                            error.instance_path, error
                        );
                        warn!(schema_id = %schema.schema_id, %message, "structural validation failure");
                        failures.push(VerificationFailure {
                            rule_id: JSON_SCHEMA_RULE_ID.to_string(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    // A broken schema document rejects every reply rather
                    // than letting unchecked data through.
                    let message = format!("invalid JSON Schema document: {e}");
                    warn!(schema_id = %schema.schema_id, %message, "schema compilation failure");
                    failures.push(VerificationFailure {
                        rule_id: JSON_SCHEMA_RULE_ID.to_string(),
                        message,
                    });
                }
            }
        }

        // ── Phase 2: Semantic rule evaluation ────────────────────────────────
        for rule in &schema.rules {
            debug!(
                rule_id = %rule.rule_id,
                description = %rule.description,
                "evaluating verification rule"
            );

            if let Some(message) = Self::check_rule(reply, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "semantic rule failed");
                failures.push(VerificationFailure {
                    rule_id: rule.rule_id.clone(),
                    message,
                });
            }
        }

        let passed = failures.is_empty();
        debug!(
            schema_id = %schema.schema_id,
            passed,
            failure_count = failures.len(),
            "verification complete"
        );

        Ok(VerificationReport { passed, failures })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use ciphersync_contracts::{
        schemas::{cloud_audit_schema, code_audit_schema},
        verify::{ReplySchema, VerificationRule, VerificationRuleType},
    };
    use ciphersync_core::traits::ReplyVerifier;

    use super::SchemaVerifier;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn make_schema(json_schema: Value, rules: Vec<VerificationRule>) -> ReplySchema {
        ReplySchema {
            schema_id: "test-schema-v1".to_string(),
            json_schema,
            rules,
        }
    }

    fn rule(id: &str, rule_type: VerificationRuleType) -> VerificationRule {
        VerificationRule {
            rule_id: id.to_string(),
            description: format!("{id} test rule"),
            rule_type,
        }
    }

    fn good_code_reply() -> Value {
        json!({
            "vulnerabilities": [
                { "title": "XSS", "severity": "WARNING", "impact": "Session theft", "fixSnippet": "escape(x)" },
                { "title": "Debug flag", "severity": "INFO", "impact": "Verbose errors", "fixSnippet": "DEBUG=False" }
            ],
            "summary": "Two findings",
            "fullRemediatedCode": "..."
        })
    }

    // ── Built-in schemas ──────────────────────────────────────────────────────

    #[test]
    fn test_code_audit_reply_passes() {
        let report = SchemaVerifier::new()
            .verify(&good_code_reply(), &code_audit_schema())
            .unwrap();
        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    #[test]
    fn test_code_audit_unknown_severity_fails() {
        let mut reply = good_code_reply();
        reply["vulnerabilities"][1]["severity"] = json!("HIGH");

        let report = SchemaVerifier::new().verify(&reply, &code_audit_schema()).unwrap();

        assert!(!report.passed);
        assert!(report.failures.iter().any(|f| f.rule_id == "severity-scale"));
        assert!(report.failures.iter().any(|f| f.rule_id == "json-schema"));
    }

    #[test]
    fn test_code_audit_missing_field_fails() {
        let reply = json!({ "vulnerabilities": [], "summary": "fine" });

        let report = SchemaVerifier::new().verify(&reply, &code_audit_schema()).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "json-schema");
    }

    #[test]
    fn test_cloud_audit_score_out_of_range_fails() {
        let reply = json!({ "score": 140, "findings": [], "summary": "great" });

        let report = SchemaVerifier::new().verify(&reply, &cloud_audit_schema()).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, "score-range");
        assert!(report.failures[0].message.contains("140"));
    }

    #[test]
    fn test_cloud_audit_string_score_fails() {
        let reply = json!({ "score": "87", "findings": [], "summary": "ok" });

        let report = SchemaVerifier::new().verify(&reply, &cloud_audit_schema()).unwrap();

        assert!(!report.passed);
        assert!(report.failures.iter().any(|f| f.message.contains("not a number")));
    }

    #[test]
    fn test_cloud_audit_free_text_severity_passes() {
        let reply = json!({
            "score": 61.5,
            "findings": [{ "title": "Open SSH", "severity": "HIGH", "blastRadius": "VPC", "remediation": "Restrict CIDR" }],
            "summary": "One exposure"
        });

        let report = SchemaVerifier::new().verify(&reply, &cloud_audit_schema()).unwrap();

        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    // ── Path resolution ───────────────────────────────────────────────────────

    #[test]
    fn test_required_field_over_array_elements() {
        let schema = make_schema(
            Value::Null,
            vec![rule(
                "req-title",
                VerificationRuleType::RequiredField {
                    field_path: "findings.*.title".to_string(),
                },
            )],
        );
        let verifier = SchemaVerifier::new();

        let ok = json!({ "findings": [{ "title": "a" }, { "title": "b" }] });
        assert!(verifier.verify(&ok, &schema).unwrap().passed);

        let empty = json!({ "findings": [] });
        assert!(verifier.verify(&empty, &schema).unwrap().passed);

        let gap = json!({ "findings": [{ "title": "a" }, { "title": null }] });
        let report = verifier.verify(&gap, &schema).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "req-title");
    }

    #[test]
    fn test_wildcard_over_non_array_is_missing() {
        let schema = make_schema(
            Value::Null,
            vec![rule(
                "req-title",
                VerificationRuleType::RequiredField {
                    field_path: "findings.*.title".to_string(),
                },
            )],
        );

        let report = SchemaVerifier::new()
            .verify(&json!({ "findings": "none" }), &schema)
            .unwrap();

        assert!(!report.passed);
    }

    #[test]
    fn test_invalid_schema_document_rejects() {
        let schema = make_schema(json!({ "type": 12 }), vec![]);

        let report = SchemaVerifier::new().verify(&json!({}), &schema).unwrap();

        assert!(!report.passed);
        assert!(report.failures[0].message.contains("invalid JSON Schema"));
    }
}
