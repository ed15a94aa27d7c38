//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document containing run metadata, a
//! verdict summary, and every offense.

use crate::offense::{AuditReport, AuditStatus, Offense, RiskLevel};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    target: &'a str,
    audit_timestamp: &'a str,
    status: &'a AuditStatus,
    risk_level: &'a RiskLevel,
    passed: bool,
    resources_analyzed: usize,
    summary: Summary,
    offenses: &'a [Offense],
}

#[derive(serde::Serialize)]
struct Summary {
    true_positives: usize,
    false_positives: usize,
    true_negatives: usize,
}

/// Formats an [`AuditReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &AuditReport) -> String {
    let (true_positives, false_positives, true_negatives) = report.count_by_verdict();
    let output = JsonOutput {
        target: &report.target,
        audit_timestamp: &report.audit_timestamp,
        status: &report.status,
        risk_level: &report.risk_level,
        passed: report.passed,
        resources_analyzed: report.resources_analyzed,
        summary: Summary {
            true_positives,
            false_positives,
            true_negatives,
        },
        offenses: &report.offenses,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
