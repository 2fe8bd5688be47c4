//! Prompt templates for every tool.
//!
//! The core preamble is prepended to every tool prompt and, for chat, to the
//! system instruction. It asks for bare JSON with no markdown so structured
//! replies can be parsed directly.

use ciphersync_contracts::report::IntelKind;

/// Sampling temperature for the schema-constrained audits.
pub const STRUCTURED_TEMPERATURE: f32 = 0.1;

/// Sampling temperature for SOC chat.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Preamble shared by every request.
pub const CORE_PREAMBLE: &str = "\
# CIPHERSYNC MASTER ENGINE
You are an elite security intelligence agent working for CipherSync.
- Output: PURE JSON.
- No markdown wrappers, no backticks, no underscores in labels.
- Format: professional, technical, zero filler.
";

/// Persona for the SOC chat assistant.
pub const SOC_EXPERT_PERSONA: &str = "\
You are a Tier 3 SOC (Security Operations Center) engineer at CipherSync.
Your goal is research-grade defensive analysis and incident command logic.

RULES:
1. When asked about illegal activity or hacking:
   - ALWAYS pivot to a DEFENSIVE stance.
   - Explain the technical theory (for example how an exploit works) only to
     help build stronger shields and detection rules.
2. When asked for legal advice:
   - State: \"CipherSync provides security logic, not legal counsel.\"
3. Style: professional, precise, technical.
";

/// Prompt for the code auditor.
pub fn code_audit_prompt(code: &str) -> String {
    format!(
        "{CORE_PREAMBLE}\
MODULE: CODE DEFENSIVE AUDITOR
Perform static application security testing on the provided code and identify vulnerabilities.
For each one provide: title, severity (CRITICAL, WARNING, INFO), impact, and a specific fix snippet.
Also provide fullRemediatedCode: the complete original file with every security patch applied.
PAYLOAD: {code}"
    )
}

/// Prompt for the cloud configuration reviewer.
pub fn cloud_audit_prompt(config: &str) -> String {
    format!(
        "{CORE_PREAMBLE}\
MODULE: CLOUD GUARD
Analyze the infrastructure for misconfigurations and toxic combinations.
Provide a score (0-100), a findings list, and an executive summary.
CONFIG: {config}"
    )
}

/// Prompt for the intel scanner.
pub fn intel_prompt(kind: IntelKind, input: &str) -> String {
    format!("{CORE_PREAMBLE}\nMODULE: INTEL CENTER\nRECON TYPE: {kind}\nINPUT: {input}")
}

/// System instruction for SOC chat: the core preamble plus the SOC persona.
pub fn soc_system_instruction() -> String {
    format!("{CORE_PREAMBLE}\n{SOC_EXPERT_PERSONA}")
}
