use crate::resource::{Location, Resource, ResourceKind};
use std::fmt;

/// A category of security smell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Smell {
    OutdatedVersion,
    SensitiveExposure,
    InjectionRisk,
    InsecureSource,
    InsecurePermissions,
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smell::OutdatedVersion => write!(f, "outdated version"),
            Smell::SensitiveExposure => write!(f, "sensitive exposure"),
            Smell::InjectionRisk => write!(f, "injection risk"),
            Smell::InsecureSource => write!(f, "insecure source"),
            Smell::InsecurePermissions => write!(f, "insecure permissions"),
        }
    }
}

/// How much a finding should be trusted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// A real issue.
    TruePositive,
    /// The heuristic over-triggers on input that is actually safe.
    FalsePositive,
    /// Correctly judged safe.
    TrueNegative,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::TruePositive => write!(f, "True Positive"),
            Verdict::FalsePositive => write!(f, "False Positive"),
            Verdict::TrueNegative => write!(f, "True Negative"),
        }
    }
}

/// The resource an offense was raised against, detached from the input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub identifier: String,
    pub location: Location,
}

impl From<&Resource> for ResourceRef {
    fn from(resource: &Resource) -> Self {
        ResourceRef {
            kind: resource.kind,
            identifier: resource.identifier.clone(),
            location: resource.location.clone(),
        }
    }
}

/// One reported finding. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Offense {
    pub rule_id: String,
    pub smell: Smell,
    pub verdict: Verdict,
    pub message: String,
    pub resource: ResourceRef,
}

impl Offense {
    pub fn new(
        resource: &Resource,
        rule_id: &str,
        smell: Smell,
        verdict: Verdict,
        message: String,
    ) -> Self {
        Offense {
            rule_id: rule_id.to_string(),
            smell,
            verdict,
            message,
            resource: ResourceRef::from(resource),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AuditReport {
    pub target: String,
    pub audit_timestamp: String,
    pub status: AuditStatus,
    pub risk_level: RiskLevel,
    pub resources_analyzed: usize,
    pub offenses: Vec<Offense>,
    pub passed: bool,
}

impl AuditReport {
    /// Assembles a report. Under `strict`, False Positives fail the audit.
    pub fn from_offenses(
        target: &str,
        resources_analyzed: usize,
        offenses: Vec<Offense>,
        strict: bool,
    ) -> Self {
        let status = compute_status(&offenses, strict);
        let risk_level = compute_risk_level(&offenses);
        let passed = !matches!(status, AuditStatus::Failed);

        AuditReport {
            target: target.to_string(),
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            risk_level,
            resources_analyzed,
            offenses,
            passed,
        }
    }

    /// Count true positives, false positives, and true negatives in a single pass.
    pub fn count_by_verdict(&self) -> (usize, usize, usize) {
        self.offenses
            .iter()
            .fold((0, 0, 0), |(tp, fp, tn), o| match o.verdict {
                Verdict::TruePositive => (tp + 1, fp, tn),
                Verdict::FalsePositive => (tp, fp + 1, tn),
                Verdict::TrueNegative => (tp, fp, tn + 1),
            })
    }

    /// Offenses that need attention (everything but True Negatives).
    pub fn actionable(&self) -> impl Iterator<Item = &Offense> {
        self.offenses
            .iter()
            .filter(|o| o.verdict != Verdict::TrueNegative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Warning,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

fn compute_status(offenses: &[Offense], strict: bool) -> AuditStatus {
    let (has_tp, has_fp) = offenses
        .iter()
        .fold((false, false), |(tp, fp), o| match o.verdict {
            Verdict::TruePositive => (true, fp),
            Verdict::FalsePositive => (tp, true),
            Verdict::TrueNegative => (tp, fp),
        });

    if has_tp {
        AuditStatus::Failed
    } else if has_fp {
        if strict {
            AuditStatus::Failed
        } else {
            AuditStatus::Warning
        }
    } else {
        AuditStatus::Passed
    }
}

fn compute_risk_level(offenses: &[Offense]) -> RiskLevel {
    let (critical, high, medium) =
        offenses
            .iter()
            .fold((false, false, false), |(crit, high, med), o| {
                let tp = o.verdict == Verdict::TruePositive;
                let is_critical = tp
                    && matches!(o.smell, Smell::InjectionRisk | Smell::InsecurePermissions);
                (
                    crit || is_critical,
                    high || tp,
                    med || o.verdict == Verdict::FalsePositive,
                )
            });

    if critical {
        RiskLevel::Critical
    } else if high {
        RiskLevel::High
    } else if medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
