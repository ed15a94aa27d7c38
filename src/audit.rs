//! Audit orchestration.
//!
//! The [`run_audit`] function is the main entry-point for auditing a
//! declaration dump (or a directory of dumps). It builds a
//! [`SmellEngine`] from the configuration, loads the dumps, analyses them,
//! and produces a final [`AuditReport`].

use crate::config::Config;
use crate::declaration::{self, DeclarationNode};
use crate::engine::SmellEngine;
use crate::error::AuditError;
use crate::offense::AuditReport;
use std::path::Path;

/// Runs a complete audit over `path`.
///
/// # Pipeline
///
/// 1. Builds the [`SmellEngine`], failing fast on invalid configuration.
/// 2. Resolves the dumps to read via [`declaration::collect_dumps`].
/// 3. Loads every dump.
/// 4. Analyses all declarations **in parallel** using [rayon].
/// 5. Assembles the final [`AuditReport`].
///
/// # Errors
///
/// Returns [`AuditError`] for invalid configuration, unreadable or
/// malformed dumps, or a directory with no dumps in it.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use oxidized_iac_smells::{audit, config::Config};
///
/// let config = Config::load(None).unwrap();
/// let report = audit::run_audit(Path::new("./recipes.json"), &config).unwrap();
///
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run_audit(path: &Path, config: &Config) -> Result<AuditReport, AuditError> {
    let engine = SmellEngine::new(config)?;

    let dumps = declaration::collect_dumps(path);
    if dumps.is_empty() {
        return Err(AuditError::NoDumps(path.to_path_buf()));
    }

    let mut nodes: Vec<DeclarationNode> = Vec::new();
    for dump in &dumps {
        nodes.extend(declaration::load_file(dump)?);
    }

    let analysis = engine.analyze(&nodes);
    tracing::info!(
        target_path = %path.display(),
        resources = analysis.resources,
        offenses = analysis.offenses.len(),
        "audit complete"
    );

    Ok(AuditReport::from_offenses(
        &extract_target_name(path),
        analysis.resources,
        analysis.offenses,
        config.strict.enabled,
    ))
}

/// Returns the last path component or `"unknown"` when the path has no
/// file-name segment (e.g., `/`).
fn extract_target_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
