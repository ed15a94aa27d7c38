//! Rendering and delivery of smell reports.
//!
//! [`format_report`] turns an [`AuditReport`] into text; [`write_report`]
//! renders it and sends it to a file or to stdout. Terminal output comes
//! from [`pretty`], scripting output from [`json`] and code-scanning
//! uploads from [`sarif`].

pub mod json;
pub mod pretty;
pub mod sarif;

use std::io::{self, Write};
use std::path::Path;

use crate::offense::AuditReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored offense listing grouped by verdict.
    Pretty,
    /// The serialized report, offenses included.
    Json,
    /// SARIF 2.1.0 log with True Negatives left out.
    Sarif,
}

impl OutputFormat {
    /// Whether the rendered text is meant for a terminal rather than a tool.
    pub fn is_human_readable(self) -> bool {
        matches!(self, OutputFormat::Pretty)
    }
}

/// Renders `report` in `format`.
///
/// ```rust,no_run
/// use oxidized_iac_smells::output::{format_report, OutputFormat};
/// # use oxidized_iac_smells::offense::AuditReport;
/// # fn render(report: &AuditReport) {
/// let sarif = format_report(report, &OutputFormat::Sarif);
/// assert!(sarif.contains("2.1.0"));
/// # }
/// ```
pub fn format_report(report: &AuditReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(report),
    }
}

/// Renders `report` and writes it to `destination`, or to stdout when no
/// destination is given.
pub fn write_report(
    report: &AuditReport,
    format: &OutputFormat,
    destination: Option<&Path>,
) -> io::Result<()> {
    let rendered = format_report(report, format);
    match destination {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            tracing::debug!(path = %path.display(), bytes = rendered.len(), "report written");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()
        }
    }
}
