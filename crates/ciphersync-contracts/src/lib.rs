//! # ciphersync-contracts
//!
//! Shared types, reply schemas, and the error type for CipherSync.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod audit;
pub mod chat;
pub mod error;
pub mod generation;
pub mod report;
pub mod schemas;
pub mod verify;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use audit::{AuditDraft, AuditKind, AuditResult};
    use chat::{ChatMessage, ChatRole, ChatSession, UNTITLED_SESSION};
    use error::CipherError;
    use report::{CloudAuditReport, CodeAuditReport, Severity};

    // ── AuditResult wire format ──────────────────────────────────────────────

    #[test]
    fn audit_result_uses_type_field_and_upper_case_kind() {
        let result = AuditDraft::new(AuditKind::Breach, "alice@example.com", "2 breaches")
            .into_result("CS-00000001".to_string(), "2026-01-01 10:00:00".to_string());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], json!("BREACH"));
        assert_eq!(value["id"], json!("CS-00000001"));
        // Absent optionals are omitted, not written as null.
        assert!(value.get("score").is_none());
        assert!(value.get("remediation").is_none());
    }

    #[test]
    fn audit_result_reads_blobs_without_optionals() {
        let blob = r#"{"id":"CS-4821","timestamp":"1/2/2025, 9:14:00 AM","type":"URL",
                       "content":"http://example.test","summary":"Looks clean"}"#;
        let result: AuditResult = serde_json::from_str(blob).unwrap();
        assert_eq!(result.kind, AuditKind::Url);
        assert_eq!(result.score, None);
        assert_eq!(result.remediation, None);
    }

    #[test]
    fn audit_result_rejects_unknown_kind() {
        let blob = r#"{"id":"x","timestamp":"t","type":"MALWARE","content":"c","summary":"s"}"#;
        assert!(serde_json::from_str::<AuditResult>(blob).is_err());
    }

    #[test]
    fn draft_ignores_blank_remediation() {
        let draft = AuditDraft::new(AuditKind::Code, "fn main() {}", "ok").with_remediation("   ");
        assert_eq!(draft.remediation, None);

        let draft = draft.with_remediation("use prepared statements");
        assert_eq!(draft.remediation.as_deref(), Some("use prepared statements"));
    }

    // ── Reports ──────────────────────────────────────────────────────────────

    #[test]
    fn code_audit_report_reads_camel_case_reply() {
        let reply = json!({
            "vulnerabilities": [{
                "title": "SQL injection",
                "severity": "CRITICAL",
                "impact": "Full database read",
                "fixSnippet": "query(\"... WHERE id = ?\", id)"
            }],
            "summary": "One critical issue",
            "fullRemediatedCode": "patched"
        });
        let report: CodeAuditReport = serde_json::from_value(reply).unwrap();
        assert_eq!(report.vulnerabilities[0].severity, Severity::Critical);
        assert_eq!(report.count(Severity::Critical), 1);
        assert_eq!(report.count(Severity::Info), 0);
        assert_eq!(report.full_remediated_code, "patched");
    }

    #[test]
    fn fallback_reports_carry_fixed_summaries() {
        let code = CodeAuditReport::parsing_error("let x = 1;");
        assert!(code.vulnerabilities.is_empty());
        assert_eq!(code.summary, "Parsing Error");
        assert_eq!(code.full_remediated_code, "let x = 1;");

        let cloud = CloudAuditReport::analysis_failed();
        assert_eq!(cloud.score, 0.0);
        assert!(cloud.findings.is_empty());
        assert_eq!(cloud.summary, "Analysis Failed");
    }

    // ── ChatSession ──────────────────────────────────────────────────────────

    #[test]
    fn chat_session_is_titled_by_first_user_message() {
        let mut session = ChatSession::new();
        assert_eq!(session.title, UNTITLED_SESSION);

        session.push(ChatMessage::user("How do I detect kerberoasting?"));
        session.push(ChatMessage::assistant("Watch for 4769 events with RC4."));
        session.push(ChatMessage::user("And golden tickets?"));

        assert_eq!(session.title, "How do I detect kerberoasting?");
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[1].role, ChatRole::Assistant);
        assert_eq!(session.last_update, session.messages[2].timestamp);
    }

    #[test]
    fn chat_session_truncates_long_titles() {
        let mut session = ChatSession::new();
        session.push(ChatMessage::user("a".repeat(100)));
        assert_eq!(session.title.chars().count(), 41);
        assert!(session.title.ends_with('…'));
    }

    #[test]
    fn chat_role_serializes_lower_case() {
        assert_eq!(serde_json::to_value(ChatRole::Assistant).unwrap(), json!("assistant"));
    }

    // ── CipherError display messages ─────────────────────────────────────────

    #[test]
    fn error_upstream_display() {
        let err = CipherError::Upstream {
            status: 429,
            message: "RESOURCE_EXHAUSTED: quota exceeded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn error_storage_display() {
        let err = CipherError::Storage {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CipherError = parse_err.into();
        assert!(matches!(err, CipherError::Serialization { .. }));
    }
}
