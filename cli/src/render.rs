//! Terminal output for each command.

use serde::Serialize;

use ciphersync_contracts::{
    audit::{AuditKind, AuditResult},
    error::CipherResult,
    report::{CloudAuditReport, CodeAuditReport, Severity},
};
use ciphersync_dashboard::{DashboardStatus, PasswordReport, Recorded};

const SUMMARY_COLUMN_CHARS: usize = 60;

pub fn json<T: Serialize>(value: &T) -> CipherResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn status(status: &DashboardStatus, as_json: bool) -> CipherResult<()> {
    if as_json {
        return json(status);
    }
    println!("Recorded results: {} / {}", status.total, status.capacity);
    for kind in AuditKind::ALL {
        println!("  {:<9} {}", kind.as_str(), status.count(kind));
    }
    Ok(())
}

pub fn code_audit(recorded: &Recorded<CodeAuditReport>) {
    let report = &recorded.output;
    println!("[{}] {}", recorded.entry.id, report.summary);
    println!(
        "Findings: {} critical, {} warning, {} info",
        report.count(Severity::Critical),
        report.count(Severity::Warning),
        report.count(Severity::Info)
    );
    for vuln in &report.vulnerabilities {
        println!();
        println!("  [{}] {}", vuln.severity, vuln.title);
        println!("    impact: {}", vuln.impact);
        println!("    fix:    {}", vuln.fix_snippet);
    }
    println!();
    println!("Remediated code:");
    println!("{}", report.full_remediated_code);
}

pub fn cloud_audit(recorded: &Recorded<CloudAuditReport>) {
    let report = &recorded.output;
    println!("[{}] {}", recorded.entry.id, report.summary);
    println!("Compliance score: {:.0}/100", report.score);
    for finding in &report.findings {
        println!();
        println!("  [{}] {}", finding.severity, finding.title);
        println!("    blast radius: {}", finding.blast_radius);
        println!("    remediation:  {}", finding.remediation);
    }
}

pub fn intel(recorded: &Recorded<String>) {
    println!("[{}] {} scan of {}", recorded.entry.id, recorded.entry.kind, recorded.entry.content);
    println!();
    println!("{}", recorded.output);
}

pub fn password(recorded: &Recorded<PasswordReport>, as_json: bool) -> CipherResult<()> {
    let report = &recorded.output;
    if as_json {
        return json(report);
    }
    println!("[{}] {}", recorded.entry.id, report.summary());
    println!("Length: {}  Alphabet: {}", report.length, report.classes.pool_size());
    for suggestion in &report.suggestions {
        println!("  - {suggestion}");
    }
    Ok(())
}

pub fn history(entries: &[AuditResult], as_json: bool) -> CipherResult<()> {
    if as_json {
        return json(&entries);
    }
    if entries.is_empty() {
        println!("No recorded results.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{:<12} {:<20} {:<9} {}",
            entry.id,
            entry.timestamp,
            entry.kind.as_str(),
            first_line(&entry.summary)
        );
    }
    Ok(())
}

fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= SUMMARY_COLUMN_CHARS {
        return line.to_string();
    }
    let mut short: String = line.chars().take(SUMMARY_COLUMN_CHARS - 1).collect();
    short.push('…');
    short
}
