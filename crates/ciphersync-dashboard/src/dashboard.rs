//! The dashboard: every tool run, recorded.
//!
//! `Dashboard` pairs the adapter with the history store. Each tool method
//! validates its input, runs the analysis, and appends one history entry
//! describing the outcome. When the analysis call itself fails (network,
//! auth, quota) the error is returned and nothing is recorded. Fallback
//! reports ("Parsing Error", "Analysis Failed") are ordinary outcomes and
//! are recorded like any other.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use ciphersync_contracts::{
    audit::{AuditDraft, AuditKind, AuditResult},
    error::{CipherError, CipherResult},
    generation::InlineImage,
    report::{CloudAuditReport, CodeAuditReport, IntelKind},
};
use ciphersync_core::{traits::KeyValueStorage, Adapter};
use ciphersync_vault::HistoryStore;

use crate::password::{self, PasswordReport};

// ── Outcome types ─────────────────────────────────────────────────────────────

/// A tool's output together with the history entry it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub output: T,
    pub entry: AuditResult,
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatus {
    pub total: usize,
    pub capacity: usize,
    pub by_kind: BTreeMap<AuditKind, usize>,
}

impl DashboardStatus {
    /// Entries of `kind`, zero when there are none.
    pub fn count(&self, kind: AuditKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// The history kind an intel scan is filed under.
pub fn intel_audit_kind(kind: IntelKind) -> AuditKind {
    match kind {
        IntelKind::Url => AuditKind::Url,
        IntelKind::User => AuditKind::Osint,
        IntelKind::Breach => AuditKind::Breach,
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

pub struct Dashboard<S> {
    adapter: Adapter,
    store: HistoryStore<S>,
}

impl<S: KeyValueStorage> Dashboard<S> {
    /// `store` should already be hydrated.
    pub fn new(adapter: Adapter, store: HistoryStore<S>) -> Self {
        Self { adapter, store }
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Audit a source file, optionally with a screenshot for context.
    ///
    /// Records a `CODE` entry whose remediation is the fully patched file.
    pub async fn code_audit(
        &mut self,
        source: &str,
        image: Option<&InlineImage>,
    ) -> CipherResult<Recorded<CodeAuditReport>> {
        require_input("source code", source)?;
        let report = self.adapter.code_audit(source, image).await?;

        let draft = AuditDraft::new(AuditKind::Code, source, report.summary.clone())
            .with_remediation(report.full_remediated_code.clone());
        Ok(self.record(report, draft))
    }

    /// Review an infrastructure configuration.
    ///
    /// Records a `CLOUD` entry carrying the compliance score and one
    /// remediation line per finding.
    pub async fn cloud_audit(
        &mut self,
        config: &str,
        image: Option<&InlineImage>,
    ) -> CipherResult<Recorded<CloudAuditReport>> {
        require_input("configuration", config)?;
        let report = self.adapter.cloud_audit(config, image).await?;

        let remediation = report
            .findings
            .iter()
            .map(|f| f.remediation.trim())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let draft = AuditDraft::new(AuditKind::Cloud, config, report.summary.clone())
            .with_score(report.score)
            .with_remediation(remediation);
        Ok(self.record(report, draft))
    }

    /// Run a reconnaissance scan; the cleaned reply is the entry's summary.
    pub async fn intel_scan(&mut self, kind: IntelKind, input: &str) -> CipherResult<Recorded<String>> {
        require_input("scan target", input)?;
        let input = input.trim();
        let text = self.adapter.intel_scan(kind, input).await?;

        let draft = AuditDraft::new(intel_audit_kind(kind), input, text.clone());
        Ok(self.record(text, draft))
    }

    /// Score a password locally.
    ///
    /// The entry's content is the password's fingerprint, never the
    /// password.
    pub fn password_check(&mut self, password: &str) -> CipherResult<Recorded<PasswordReport>> {
        if password.is_empty() {
            return Err(CipherError::InvalidInput {
                reason: "password is empty".to_string(),
            });
        }
        let report = password::analyze(password);

        let draft = AuditDraft::new(AuditKind::Password, password::fingerprint(password), report.summary())
            .with_score(f64::from(report.score))
            .with_remediation(report.suggestions.join("\n"));
        Ok(self.record(report, draft))
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            total: self.store.len(),
            capacity: self.store.capacity(),
            by_kind: self.store.count_by_kind(),
        }
    }

    // ── History ───────────────────────────────────────────────────────────────

    /// Recorded results, newest first.
    pub fn history(&self) -> &[AuditResult] {
        self.store.entries()
    }

    pub fn history_entry(&self, id: &str) -> Option<&AuditResult> {
        self.store.get(id)
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        self.store.delete_by_id(id)
    }

    pub fn purge_history(&mut self) {
        self.store.purge_all();
    }

    pub fn store(&self) -> &HistoryStore<S> {
        &self.store
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn record<T>(&mut self, output: T, draft: AuditDraft) -> Recorded<T> {
        let entry = self.store.append(draft);
        info!(id = %entry.id, kind = %entry.kind, "tool run recorded");
        Recorded { output, entry }
    }
}

fn require_input(what: &str, value: &str) -> CipherResult<()> {
    if value.trim().is_empty() {
        return Err(CipherError::InvalidInput {
            reason: format!("{what} is empty"),
        });
    }
    Ok(())
}
