//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes: a header, the
//! actionable offenses with their locations, a compact count of True
//! Negatives, and a one-line summary.

use crate::offense::{AuditReport, AuditStatus, Verdict};
use colored::Colorize;

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: target name and timestamp.
/// 2. **Offenses**: True and False Positives with rule, location, and message.
/// 3. **True Negatives**: resources judged safe, one line each.
/// 4. **Summary**: overall status and verdict counts.
pub fn format(report: &AuditReport) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        format!("  IaC Smell Audit: {}  ", report.target)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n", report.audit_timestamp));
    out.push_str(&format!(
        "  Resources analyzed: {}\n\n",
        report.resources_analyzed
    ));

    let mut actionable = report.actionable().peekable();
    if actionable.peek().is_some() {
        out.push_str(&format!("{}\n", "Offenses".bold().underline()));
        for offense in actionable {
            let verdict_str = match offense.verdict {
                Verdict::TruePositive => "  TP".red().bold().to_string(),
                Verdict::FalsePositive => "  FP".yellow().bold().to_string(),
                Verdict::TrueNegative => "  TN".green().to_string(),
            };

            out.push_str(&format!(
                "  [{verdict_str}] {rule_id:<30} {message}\n",
                rule_id = offense.rule_id.dimmed(),
                message = offense.message,
            ));
            out.push_str(&format!(
                "         {} {}\n",
                offense.resource.kind.to_string().dimmed(),
                offense.resource.location.to_string().dimmed()
            ));
        }
        out.push('\n');
    }

    let mut negatives = report
        .offenses
        .iter()
        .filter(|o| o.verdict == Verdict::TrueNegative)
        .peekable();
    if negatives.peek().is_some() {
        out.push_str(&format!("{}\n", "True Negatives".bold().underline()));
        for offense in negatives {
            out.push_str(&format!(
                "  [{}] {:<30} {}\n",
                "  OK".green(),
                offense.rule_id.dimmed(),
                offense.resource.identifier.dimmed(),
            ));
        }
        out.push('\n');
    }

    // Summary
    let status_str = match report.status {
        AuditStatus::Passed => "PASSED".green().bold().to_string(),
        AuditStatus::Warning => "WARNING".yellow().bold().to_string(),
        AuditStatus::Failed => "FAILED".red().bold().to_string(),
    };

    let (tp, fp, tn) = report.count_by_verdict();
    out.push_str(&format!(
        "Result: {status_str}  |  {tp} true positives, {fp} false positives, {tn} true negatives\n",
    ));

    out
}
