//! Sensitive information exposure detector.
//!
//! Classifies inline file content and, when the file declares a mode, lets
//! the permission verdict take precedence over plain sensitivity reporting.
//! Files without usable content (remote downloads, mode-only declarations)
//! are still judged on their filename and mode.
//!
//! # Rules
//!
//! | ID | Verdict | What it checks |
//! |----|---------|----------------|
//! | `exposure/insecure-permissions` | True Positive | sensitive content, mode above `max_permissions` |
//! | `exposure/insecure-filename` | True Positive | sensitive filename, mode above `max_permissions` |
//! | `exposure/sensitive` | True Positive | sensitive content or filename |
//! | `exposure/secure-handling` | True Negative | secret fetched via `vault(` / `data_bag(` / … |
//! | `exposure/non-sensitive` | False Positive | explicit non-sensitive marker (`env=production`) |
//! | `exposure/clean` | True Negative | nothing sensitive |

use crate::classifier::{Classification, ContentContext, ExposureCategory};
use crate::engine::Analyzers;
use crate::offense::{Offense, Smell, Verdict};
use crate::permissions::{format_mode, PermissionVerdict};
use crate::resource::{Resource, ResourceKind, CONTENT, MODE};
use crate::smells::{snippet, Detector, RuleInfo};

pub struct SensitiveExposureDetector;

impl Detector for SensitiveExposureDetector {
    fn name(&self) -> &'static str {
        "sensitive_exposure"
    }

    fn description(&self) -> &'static str {
        "Inline secrets in file content and overly permissive file modes"
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        matches!(kind, ResourceKind::File | ResourceKind::RemoteFile)
    }

    fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
        let Some((content, text)) = resource
            .attribute(CONTENT)
            .and_then(|c| c.text().map(|t| (c, t)))
        else {
            return check_filename_mode(resource, analyzers);
        };
        let path = resource.identifier.as_str();

        let classification = analyzers.classifier.classify(
            content,
            ContentContext::File,
            Some(resource.basename()),
        );

        let (rule_id, smell, verdict, message) = match classification.exposure_category() {
            ExposureCategory::SecureHandling => (
                "exposure/secure-handling",
                Smell::SensitiveExposure,
                Verdict::TrueNegative,
                format!(
                    "Secure handling of sensitive information detected in {path}. Security Smell: True Negative"
                ),
            ),
            ExposureCategory::Sensitive => {
                let mode = resource.attribute(MODE);
                match analyzers.permissions.evaluate(mode, &classification) {
                    PermissionVerdict::InsecurePermissions { actual, max } => (
                        "exposure/insecure-permissions",
                        Smell::InsecurePermissions,
                        Verdict::TruePositive,
                        format!(
                            "Sensitive information exposure in {path} (content: {}). Permissions {} are too permissive (max allowed: {}). Security Smell: True Positive",
                            snippet(text),
                            format_mode(actual),
                            format_mode(max),
                        ),
                    ),
                    PermissionVerdict::InsecureFilename { actual, max } => (
                        "exposure/insecure-filename",
                        Smell::InsecurePermissions,
                        Verdict::TruePositive,
                        insecure_filename_message(path, actual, max),
                    ),
                    _ => (
                        "exposure/sensitive",
                        Smell::SensitiveExposure,
                        Verdict::TruePositive,
                        format!(
                            "Sensitive information exposure in {path} (content: {}). Security Smell: True Positive",
                            snippet(text),
                        ),
                    ),
                }
            }
            ExposureCategory::Benign => (
                "exposure/non-sensitive",
                Smell::SensitiveExposure,
                Verdict::FalsePositive,
                format!("Non-sensitive content in {path}. Security Smell: False Positive"),
            ),
            ExposureCategory::Clean => (
                "exposure/clean",
                Smell::SensitiveExposure,
                Verdict::TrueNegative,
                format!(
                    "No sensitive information detected in {path}. Security Smell: True Negative"
                ),
            ),
        };

        Some(Offense::new(resource, rule_id, smell, verdict, message))
    }
}

/// Without content only a sensitive filename with a permissive mode is
/// reportable; everything else yields no offense.
fn check_filename_mode(resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
    let mode = resource.attribute(MODE)?;
    let classification = Classification {
        sensitive_filename: analyzers
            .classifier
            .is_sensitive_filename(resource.basename()),
        ..Classification::default()
    };

    match analyzers.permissions.evaluate(Some(mode), &classification) {
        PermissionVerdict::InsecureFilename { actual, max } => Some(Offense::new(
            resource,
            "exposure/insecure-filename",
            Smell::InsecurePermissions,
            Verdict::TruePositive,
            insecure_filename_message(&resource.identifier, actual, max),
        )),
        _ => None,
    }
}

fn insecure_filename_message(path: &str, actual: u32, max: u32) -> String {
    format!(
        "Sensitive filename {path} is exposed. Permissions {} are too permissive (max allowed: {}). Security Smell: True Positive",
        format_mode(actual),
        format_mode(max),
    )
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "exposure/insecure-permissions",
            smell: Smell::InsecurePermissions,
            verdict: Verdict::TruePositive,
            detector: "sensitive_exposure",
            message: "Sensitive content written with a mode above max_permissions",
            remediation: "Move the secret to a vault or data bag and restrict the mode (e.g. '0600')",
        },
        RuleInfo {
            id: "exposure/insecure-filename",
            smell: Smell::InsecurePermissions,
            verdict: Verdict::TruePositive,
            detector: "sensitive_exposure",
            message: "Sensitive filename written with a mode above max_permissions",
            remediation: "Restrict the mode of key, certificate, and config files (e.g. '0600')",
        },
        RuleInfo {
            id: "exposure/sensitive",
            smell: Smell::SensitiveExposure,
            verdict: Verdict::TruePositive,
            detector: "sensitive_exposure",
            message: "Sensitive information inlined in file content",
            remediation: "Fetch secrets at converge time with vault(...) or data_bag(...) instead of inlining them",
        },
        RuleInfo {
            id: "exposure/secure-handling",
            smell: Smell::SensitiveExposure,
            verdict: Verdict::TrueNegative,
            detector: "sensitive_exposure",
            message: "Sensitive information fetched through a secret-retrieval function",
            remediation: "None needed",
        },
        RuleInfo {
            id: "exposure/non-sensitive",
            smell: Smell::SensitiveExposure,
            verdict: Verdict::FalsePositive,
            detector: "sensitive_exposure",
            message: "Content carries an explicit non-sensitive marker (environment name)",
            remediation: "None needed; review if the file later gains secrets",
        },
        RuleInfo {
            id: "exposure/clean",
            smell: Smell::SensitiveExposure,
            verdict: Verdict::TrueNegative,
            detector: "sensitive_exposure",
            message: "No sensitive information detected",
            remediation: "None needed",
        },
    ]
}
