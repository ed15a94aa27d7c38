//! Insecure remote source detector.
//!
//! # Rules
//!
//! | ID | Verdict | What it checks |
//! |----|---------|----------------|
//! | `source/insecure-transport` | True Positive | `http://` or `ftp://` download |
//! | `source/untrusted` | True Positive | host not in `[allowlist] domains`, no checksum |
//! | `source/checksum-pinned` | False Positive | unlisted host, but the download is pinned by `checksum` |
//! | `source/trusted` | True Negative | allowlisted host over TLS, or a local file |

use crate::engine::Analyzers;
use crate::offense::{Offense, Smell, Verdict};
use crate::resource::{Resource, ResourceKind, CHECKSUM, SOURCE};
use crate::smells::{Detector, RuleInfo};
use crate::source::SourceVerdict;

pub struct InsecureSourceDetector;

impl Detector for InsecureSourceDetector {
    fn name(&self) -> &'static str {
        "insecure_source"
    }

    fn description(&self) -> &'static str {
        "Remote downloads over plain transport or from unlisted hosts"
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        kind == ResourceKind::RemoteFile
    }

    fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
        let Some(url) = resource.attribute(SOURCE).and_then(|v| v.as_literal()) else {
            tracing::debug!(
                path = %resource.identifier,
                "source is not a literal; source check skipped"
            );
            return None;
        };
        let path = resource.identifier.as_str();
        let has_checksum = resource
            .attribute(CHECKSUM)
            .and_then(|v| v.as_literal())
            .is_some_and(|c| !c.trim().is_empty());

        let (rule_id, verdict, message) = match analyzers.sources.evaluate(url, has_checksum) {
            SourceVerdict::InsecureTransport { scheme } => (
                "source/insecure-transport",
                Verdict::TruePositive,
                format!(
                    "Insecure source {url} for {path}: {scheme} transport is unencrypted. Security Smell: True Positive"
                ),
            ),
            SourceVerdict::Untrusted { host } => (
                "source/untrusted",
                Verdict::TruePositive,
                format!(
                    "Untrusted source {url} for {path}: host '{host}' is not in the allowlist. Security Smell: True Positive"
                ),
            ),
            SourceVerdict::PinnedByChecksum { host } => (
                "source/checksum-pinned",
                Verdict::FalsePositive,
                format!(
                    "Source {url} for {path}: host '{host}' is not in the allowlist but the download is pinned by checksum. Security Smell: False Positive"
                ),
            ),
            SourceVerdict::Trusted { .. } => (
                "source/trusted",
                Verdict::TrueNegative,
                format!("Trusted source {url} for {path}. Security Smell: True Negative"),
            ),
            SourceVerdict::Local => (
                "source/trusted",
                Verdict::TrueNegative,
                format!("Local source {url} for {path}. Security Smell: True Negative"),
            ),
        };

        Some(Offense::new(
            resource,
            rule_id,
            Smell::InsecureSource,
            verdict,
            message,
        ))
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "source/insecure-transport",
            smell: Smell::InsecureSource,
            verdict: Verdict::TruePositive,
            detector: "insecure_source",
            message: "Remote file downloaded over unencrypted transport",
            remediation: "Use an https:// URL and pin the download with a checksum",
        },
        RuleInfo {
            id: "source/untrusted",
            smell: Smell::InsecureSource,
            verdict: Verdict::TruePositive,
            detector: "insecure_source",
            message: "Remote file downloaded from a host outside the allowlist",
            remediation: "Add a checksum, or add the host to [allowlist] domains if it is trusted",
        },
        RuleInfo {
            id: "source/checksum-pinned",
            smell: Smell::InsecureSource,
            verdict: Verdict::FalsePositive,
            detector: "insecure_source",
            message: "Unlisted host, but the download is verified by checksum",
            remediation: "None needed; consider allowlisting the host",
        },
        RuleInfo {
            id: "source/trusted",
            smell: Smell::InsecureSource,
            verdict: Verdict::TrueNegative,
            detector: "insecure_source",
            message: "Download from an allowlisted host over TLS, or from a local path",
            remediation: "None needed",
        },
    ]
}
