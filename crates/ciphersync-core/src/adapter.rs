//! The prompt/response adapter: one async call per dashboard tool.
//!
//! Every operation follows the same shape:
//!
//!   Template → Backend::generate → Parse → Verify → Typed result
//!
//! The adapter holds no mutable state. Schema-constrained calls (code and
//! cloud audits) never fail on a bad reply: a reply that does not parse or
//! does not pass the verifier is replaced by a fixed, clearly labelled
//! fallback report. Transport and service failures are NOT caught and reach
//! the caller as `CipherError`.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use ciphersync_contracts::{
    chat::{ChatMessage, ChatRole},
    error::CipherResult,
    generation::{Content, GenerationConfig, GenerationRequest, InlineImage, Part, Role},
    report::{CloudAuditReport, CodeAuditReport, IntelKind},
    schemas::{cloud_audit_schema, code_audit_schema},
    verify::ReplySchema,
};

use crate::{
    prompts::{
        cloud_audit_prompt, code_audit_prompt, intel_prompt, soc_system_instruction,
        CHAT_TEMPERATURE, STRUCTURED_TEMPERATURE,
    },
    text::clean_text,
    traits::{GenerativeBackend, ReplyVerifier},
};

/// Translates tool requests into generation requests and normalizes replies.
pub struct Adapter {
    backend: Box<dyn GenerativeBackend>,
    verifier: Box<dyn ReplyVerifier>,
    model: String,
}

impl Adapter {
    /// Create an adapter that sends every request to `model` via `backend`.
    pub fn new(
        backend: Box<dyn GenerativeBackend>,
        verifier: Box<dyn ReplyVerifier>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            verifier,
            model: model.into(),
        }
    }

    /// The model identifier requests are addressed to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Static security analysis of a source file.
    ///
    /// # Errors
    ///
    /// Only transport and service failures. An unusable reply yields
    /// `CodeAuditReport::parsing_error(source)`.
    pub async fn code_audit(
        &self,
        source: &str,
        image: Option<&InlineImage>,
    ) -> CipherResult<CodeAuditReport> {
        let schema = code_audit_schema();
        let request = self.structured_request(code_audit_prompt(source), image, &schema);

        debug!(model = %self.model, bytes = source.len(), has_image = image.is_some(), "code audit requested");
        let reply = self.backend.generate(request).await?;

        let report = self
            .decode_reply(&schema, reply.text.as_deref())
            .unwrap_or_else(|| CodeAuditReport::parsing_error(source));

        info!(
            findings = report.vulnerabilities.len(),
            summary = %report.summary,
            "code audit complete"
        );
        Ok(report)
    }

    /// Misconfiguration review of an infrastructure configuration.
    ///
    /// # Errors
    ///
    /// Only transport and service failures. An unusable reply yields
    /// `CloudAuditReport::analysis_failed()`.
    pub async fn cloud_audit(
        &self,
        config: &str,
        image: Option<&InlineImage>,
    ) -> CipherResult<CloudAuditReport> {
        let schema = cloud_audit_schema();
        let request = self.structured_request(cloud_audit_prompt(config), image, &schema);

        debug!(model = %self.model, bytes = config.len(), has_image = image.is_some(), "cloud audit requested");
        let reply = self.backend.generate(request).await?;

        let report = self
            .decode_reply(&schema, reply.text.as_deref())
            .unwrap_or_else(CloudAuditReport::analysis_failed);

        info!(
            score = report.score,
            findings = report.findings.len(),
            "cloud audit complete"
        );
        Ok(report)
    }

    /// Free-text reconnaissance on a URL, username, or breach identifier.
    pub async fn intel_scan(&self, kind: IntelKind, input: &str) -> CipherResult<String> {
        let request = GenerationRequest {
            model: self.model.clone(),
            contents: vec![Content::user_text(intel_prompt(kind, input))],
            config: GenerationConfig::default(),
        };

        debug!(model = %self.model, %kind, "intel scan requested");
        let reply = self.backend.generate(request).await?;
        let text = clean_text(reply.text.as_deref().unwrap_or_default());

        info!(%kind, chars = text.len(), "intel scan complete");
        Ok(text)
    }

    pub async fn url_analysis(&self, url: &str) -> CipherResult<String> {
        self.intel_scan(IntelKind::Url, url).await
    }

    pub async fn osint_search(&self, query: &str) -> CipherResult<String> {
        self.intel_scan(IntelKind::User, query).await
    }

    pub async fn breach_check(&self, identifier: &str) -> CipherResult<String> {
        self.intel_scan(IntelKind::Breach, identifier).await
    }

    /// One SOC chat turn.
    ///
    /// `history` is replayed in order with assistant turns mapped to the
    /// service's `model` role, followed by `message` as a new user turn.
    pub async fn chat_turn(&self, history: &[ChatMessage], message: &str) -> CipherResult<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| match m.role {
                ChatRole::User => Content::user_text(m.text.clone()),
                ChatRole::Assistant => Content::model_text(m.text.clone()),
            })
            .collect();
        contents.push(Content::user_text(message));

        let request = GenerationRequest {
            model: self.model.clone(),
            contents,
            config: GenerationConfig {
                temperature: Some(CHAT_TEMPERATURE),
                response_schema: None,
                system_instruction: Some(soc_system_instruction()),
            },
        };

        debug!(model = %self.model, turns = history.len() + 1, "chat turn requested");
        let reply = self.backend.generate(request).await?;
        Ok(clean_text(reply.text.as_deref().unwrap_or_default()))
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// A single user turn with the prompt, an optional image, and the
    /// schema as the output constraint.
    fn structured_request(
        &self,
        prompt: String,
        image: Option<&InlineImage>,
        schema: &ReplySchema,
    ) -> GenerationRequest {
        let mut parts = vec![Part::Text(prompt)];
        if let Some(image) = image {
            parts.push(Part::InlineData(image.clone()));
        }

        GenerationRequest {
            model: self.model.clone(),
            contents: vec![Content {
                role: Role::User,
                parts,
            }],
            config: GenerationConfig {
                temperature: Some(STRUCTURED_TEMPERATURE),
                response_schema: Some(schema.json_schema.clone()),
                system_instruction: None,
            },
        }
    }

    /// Parse, verify, and deserialize a JSON reply.
    ///
    /// Returns `None` (after logging why) when any stage rejects the reply.
    fn decode_reply<T: DeserializeOwned>(
        &self,
        schema: &ReplySchema,
        text: Option<&str>,
    ) -> Option<T> {
        let raw = text.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            warn!(schema_id = %schema.schema_id, "model reply carried no text");
            return None;
        }

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(schema_id = %schema.schema_id, error = %e, "model reply is not valid JSON");
                return None;
            }
        };

        match self.verifier.verify(&value, schema) {
            Ok(report) if report.passed => {}
            Ok(report) => {
                warn!(
                    schema_id = %schema.schema_id,
                    failures = %report.describe_failures(),
                    "model reply failed verification"
                );
                return None;
            }
            Err(e) => {
                warn!(schema_id = %schema.schema_id, error = %e, "reply verifier errored");
                return None;
            }
        }

        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(schema_id = %schema.schema_id, error = %e, "verified reply did not match report type");
                None
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use ciphersync_contracts::{
        chat::ChatMessage,
        error::{CipherError, CipherResult},
        generation::{InlineImage, Part, Role},
        report::{IntelKind, Severity},
        verify::{ReplySchema, VerificationFailure, VerificationReport},
    };

    use crate::{
        prompts::{CHAT_TEMPERATURE, STRUCTURED_TEMPERATURE},
        scripted::{ScriptedBackend, ScriptedReply},
        traits::ReplyVerifier,
    };

    use super::Adapter;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// Checks only that the reply is an object holding the schema's
    /// top-level `required` keys.
    struct RequiredKeysVerifier;

    impl ReplyVerifier for RequiredKeysVerifier {
        fn verify(&self, reply: &Value, schema: &ReplySchema) -> CipherResult<VerificationReport> {
            let required = schema.json_schema["required"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            let failures: Vec<VerificationFailure> = required
                .iter()
                .filter_map(|k| k.as_str())
                .filter(|k| reply.get(*k).is_none())
                .map(|k| VerificationFailure {
                    rule_id: "json-schema".to_string(),
                    message: format!("missing {k}"),
                })
                .collect();
            Ok(VerificationReport {
                passed: failures.is_empty(),
                failures,
            })
        }
    }

    /// Rejects everything.
    struct RejectingVerifier;

    impl ReplyVerifier for RejectingVerifier {
        fn verify(&self, _reply: &Value, _schema: &ReplySchema) -> CipherResult<VerificationReport> {
            Ok(VerificationReport {
                passed: false,
                failures: vec![VerificationFailure {
                    rule_id: "score-range".to_string(),
                    message: "score 140 is outside 0..=100".to_string(),
                }],
            })
        }
    }

    fn adapter(backend: &ScriptedBackend) -> Adapter {
        Adapter::new(
            Box::new(backend.clone()),
            Box::new(RequiredKeysVerifier),
            "test-model",
        )
    }

    fn text_of(part: &Part) -> &str {
        match part {
            Part::Text(t) => t,
            Part::InlineData(_) => panic!("expected a text part"),
        }
    }

    // ── Code audit ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn code_audit_returns_typed_report() {
        let backend = ScriptedBackend::new().reply(
            json!({
                "vulnerabilities": [{
                    "title": "Command injection",
                    "severity": "CRITICAL",
                    "impact": "Remote code execution",
                    "fixSnippet": "subprocess.run([\"ls\", path])"
                }],
                "summary": "One critical issue",
                "fullRemediatedCode": "import subprocess"
            })
            .to_string(),
        );

        let report = adapter(&backend)
            .code_audit("os.system('ls ' + path)", None)
            .await
            .unwrap();

        assert_eq!(report.vulnerabilities.len(), 1);
        assert_eq!(report.vulnerabilities[0].severity, Severity::Critical);
        assert_eq!(report.summary, "One critical issue");
    }

    #[tokio::test]
    async fn code_audit_malformed_reply_yields_parsing_error() {
        let backend = ScriptedBackend::new().reply("Sure! Here is the audit: {vulnerabilities: [");

        let report = adapter(&backend).code_audit("SELECT * FROM t", None).await.unwrap();

        assert!(report.vulnerabilities.is_empty());
        assert_eq!(report.summary, "Parsing Error");
        assert_eq!(report.full_remediated_code, "SELECT * FROM t");
    }

    #[tokio::test]
    async fn code_audit_missing_text_yields_parsing_error() {
        let backend = ScriptedBackend::new().push(ScriptedReply::NoText);

        let report = adapter(&backend).code_audit("x = 1", None).await.unwrap();

        assert_eq!(report.summary, "Parsing Error");
        assert_eq!(report.full_remediated_code, "x = 1");
    }

    #[tokio::test]
    async fn code_audit_reply_missing_fields_yields_parsing_error() {
        let backend = ScriptedBackend::new().reply(r#"{"summary":"only a summary"}"#);

        let report = adapter(&backend).code_audit("x = 1", None).await.unwrap();

        assert_eq!(report.summary, "Parsing Error");
    }

    #[tokio::test]
    async fn code_audit_sends_schema_image_and_low_temperature() {
        let backend = ScriptedBackend::new().reply("{}");
        let image = InlineImage::jpeg("aGVsbG8=");

        adapter(&backend).code_audit("fn f() {}", Some(&image)).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.config.temperature, Some(STRUCTURED_TEMPERATURE));
        assert!(request.config.response_schema.is_some());
        assert!(request.config.system_instruction.is_none());

        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(text_of(&parts[0]).ends_with("PAYLOAD: fn f() {}"));
        assert_eq!(parts[1], Part::InlineData(image));
    }

    #[tokio::test]
    async fn code_audit_propagates_service_failure() {
        let backend = ScriptedBackend::new().fail(401, "API key not valid");

        let err = adapter(&backend).code_audit("x", None).await.unwrap_err();

        assert!(matches!(err, CipherError::Upstream { status: 401, .. }));
    }

    // ── Cloud audit ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn cloud_audit_returns_typed_report() {
        let backend = ScriptedBackend::new().reply(
            json!({
                "score": 42,
                "findings": [{
                    "title": "Public bucket",
                    "severity": "HIGH",
                    "blastRadius": "All customer uploads",
                    "remediation": "Enable block public access"
                }],
                "summary": "Storage is exposed"
            })
            .to_string(),
        );

        let report = adapter(&backend).cloud_audit("acl = public-read", None).await.unwrap();

        assert_eq!(report.score, 42.0);
        assert_eq!(report.findings[0].blast_radius, "All customer uploads");
    }

    #[tokio::test]
    async fn cloud_audit_rejected_reply_yields_analysis_failed() {
        let backend = ScriptedBackend::new()
            .reply(r#"{"score":140,"findings":[],"summary":"Too good"}"#);
        let adapter = Adapter::new(Box::new(backend), Box::new(RejectingVerifier), "test-model");

        let report = adapter.cloud_audit("{}", None).await.unwrap();

        assert_eq!(report.score, 0.0);
        assert!(report.findings.is_empty());
        assert_eq!(report.summary, "Analysis Failed");
    }

    #[tokio::test]
    async fn cloud_audit_non_json_yields_analysis_failed() {
        let backend = ScriptedBackend::new().reply("```json\nnot really\n```");

        let report = adapter(&backend).cloud_audit("{}", None).await.unwrap();

        assert_eq!(report.summary, "Analysis Failed");
    }

    // ── Intel scan ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn intel_scan_cleans_reply_and_names_kind() {
        let backend = ScriptedBackend::new().reply("  ## Verdict\n**Phishing** kit_detected  ");

        let text = adapter(&backend)
            .url_analysis("http://login-paypa1.example")
            .await
            .unwrap();

        assert_eq!(text, "Verdict\nPhishing kitdetected");

        let request = &backend.requests()[0];
        assert_eq!(request.config, Default::default());
        let prompt = text_of(&request.contents[0].parts[0]);
        assert!(prompt.contains("RECON TYPE: URL"));
        assert!(prompt.contains("INPUT: http://login-paypa1.example"));
    }

    #[tokio::test]
    async fn intel_wrappers_map_to_kinds() {
        let backend = ScriptedBackend::new().reply("a").reply("b");
        let adapter = adapter(&backend);

        adapter.osint_search("@handle").await.unwrap();
        adapter.breach_check("alice@example.com").await.unwrap();

        let requests = backend.requests();
        assert!(text_of(&requests[0].contents[0].parts[0]).contains(&format!("RECON TYPE: {}", IntelKind::User)));
        assert!(text_of(&requests[1].contents[0].parts[0]).contains("RECON TYPE: BREACH"));
    }

    #[tokio::test]
    async fn intel_scan_propagates_transport_failure() {
        // Nothing queued: the scripted backend reports a transport error.
        let backend = ScriptedBackend::new();

        let err = adapter(&backend).breach_check("bob").await.unwrap_err();

        assert!(matches!(err, CipherError::Transport { .. }));
    }

    // ── Chat ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_turn_maps_roles_and_appends_message() {
        let backend = ScriptedBackend::new().reply("Enable *MFA* everywhere.");
        let history = vec![
            ChatMessage::user("We saw impossible-travel logins."),
            ChatMessage::assistant("Which identity provider?"),
        ];

        let reply = adapter(&backend)
            .chat_turn(&history, "Azure AD")
            .await
            .unwrap();

        assert_eq!(reply, "Enable MFA everywhere.");

        let request = &backend.requests()[0];
        let roles: Vec<Role> = request.contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
        assert_eq!(text_of(&request.contents[2].parts[0]), "Azure AD");
        assert_eq!(request.config.temperature, Some(CHAT_TEMPERATURE));
        let instruction = request.config.system_instruction.as_deref().unwrap();
        assert!(instruction.contains("DEFENSIVE stance"));
        assert!(request.config.response_schema.is_none());
    }

    #[tokio::test]
    async fn chat_turn_without_text_returns_empty_string() {
        let backend = ScriptedBackend::new().push(ScriptedReply::NoText);

        let reply = adapter(&backend).chat_turn(&[], "hello").await.unwrap();

        assert_eq!(reply, "");
    }
}
