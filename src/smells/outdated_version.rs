//! Outdated package version detector.
//!
//! # Rules
//!
//! | ID | Verdict | What it checks |
//! |----|---------|----------------|
//! | `version/outdated` | True Positive | version strictly older than the known latest |
//! | `version/latest` | False Positive | version pinned to the `latest` sentinel |
//! | `version/current` | True Negative | version at or beyond the known latest |
//! | `version/unknown` | True Negative | no baseline, or version not comparable |

use crate::engine::Analyzers;
use crate::offense::{Offense, Smell, Verdict};
use crate::oracle::VersionStatus;
use crate::resource::{Resource, ResourceKind, VERSION};
use crate::smells::{Detector, RuleInfo};

pub struct OutdatedVersionDetector;

impl Detector for OutdatedVersionDetector {
    fn name(&self) -> &'static str {
        "outdated_version"
    }

    fn description(&self) -> &'static str {
        "Package versions older than the known latest release"
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        kind == ResourceKind::Package
    }

    fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
        let Some(version) = resource.attribute(VERSION).and_then(|v| v.as_literal()) else {
            tracing::debug!(
                package = %resource.identifier,
                "version is not a literal; outdated check skipped"
            );
            return None;
        };
        let package = resource.identifier.as_str();

        let (rule_id, verdict, message) = match analyzers.oracle.check(package, version) {
            VersionStatus::Latest => (
                "version/latest",
                Verdict::FalsePositive,
                format!(
                    "{package} version is 'latest'. Security Smell: False Positive (Correct, but may trigger outdated check)."
                ),
            ),
            VersionStatus::Outdated { latest } => (
                "version/outdated",
                Verdict::TruePositive,
                format!("{package} version {version} is outdated. Latest: {latest}."),
            ),
            VersionStatus::Current { latest } => (
                "version/current",
                Verdict::TrueNegative,
                format!(
                    "{package} version {version} is up to date. Latest: {latest}. Security Smell: True Negative"
                ),
            ),
            VersionStatus::Unknown => (
                "version/unknown",
                Verdict::TrueNegative,
                format!(
                    "{package} version {version} has no known latest version to compare against. Security Smell: True Negative"
                ),
            ),
            VersionStatus::Incomparable { latest } => (
                "version/unknown",
                Verdict::TrueNegative,
                format!(
                    "{package} version {version} cannot be compared with latest {latest}. Security Smell: True Negative"
                ),
            ),
        };

        Some(Offense::new(
            resource,
            rule_id,
            Smell::OutdatedVersion,
            verdict,
            message,
        ))
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "version/outdated",
            smell: Smell::OutdatedVersion,
            verdict: Verdict::TruePositive,
            detector: "outdated_version",
            message: "Package version is older than the known latest release",
            remediation: "Upgrade to the latest release or update [latest_versions] if the baseline is stale",
        },
        RuleInfo {
            id: "version/latest",
            smell: Smell::OutdatedVersion,
            verdict: Verdict::FalsePositive,
            detector: "outdated_version",
            message: "Package version is 'latest': not outdated, but unpinned",
            remediation: "Pin an explicit version for reproducible provisioning",
        },
        RuleInfo {
            id: "version/current",
            smell: Smell::OutdatedVersion,
            verdict: Verdict::TrueNegative,
            detector: "outdated_version",
            message: "Package version is at or beyond the known latest release",
            remediation: "None needed",
        },
        RuleInfo {
            id: "version/unknown",
            smell: Smell::OutdatedVersion,
            verdict: Verdict::TrueNegative,
            detector: "outdated_version",
            message: "No usable baseline to compare the package version against",
            remediation: "Add the package to [latest_versions] to track it",
        },
    ]
}
