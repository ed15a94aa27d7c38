//! SQL, code, and command injection detector.
//!
//! File content is checked for unsafe SQL construction and generic code
//! injection. Commands (`execute`, `bash`, …) and scripted blocks are checked
//! in [`ContentContext::Command`], where template interpolation also counts.
//!
//! # Rules
//!
//! | ID | Verdict | What it checks |
//! |----|---------|----------------|
//! | `injection/sql` | True Positive | SQL keyword with unsafe interpolation/concatenation |
//! | `injection/code` | True Positive | `eval(`, `exec(`, `system(`, backticks, `${…}`, templated tags |
//! | `injection/sanitized` | False Positive | bound parameters or escape/sanitize/quote calls |
//! | `injection/none` | True Negative | no injection construct |

use crate::classifier::{ContentContext, InjectionCategory};
use crate::engine::Analyzers;
use crate::offense::{Offense, Smell, Verdict};
use crate::resource::{Resource, ResourceKind, BLOCK, CODE, COMMAND, CONTENT};
use crate::smells::{snippet, Detector, RuleInfo};

pub struct InjectionDetector;

impl Detector for InjectionDetector {
    fn name(&self) -> &'static str {
        "injection_risk"
    }

    fn description(&self) -> &'static str {
        "SQL, code, and command injection in content, commands, and scripted blocks"
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        matches!(
            kind,
            ResourceKind::File | ResourceKind::Execute | ResourceKind::ScriptedBlock
        )
    }

    fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
        let (content, context, label) = match resource.kind {
            ResourceKind::File => (resource.attribute(CONTENT)?, ContentContext::File, "content"),
            ResourceKind::Execute => (
                resource
                    .attribute(COMMAND)
                    .or_else(|| resource.attribute(CODE))?,
                ContentContext::Command,
                "command",
            ),
            ResourceKind::ScriptedBlock => {
                (resource.attribute(BLOCK)?, ContentContext::Command, "block")
            }
            ResourceKind::Package | ResourceKind::RemoteFile => return None,
        };
        let text = content.text()?;
        let path = resource.identifier.as_str();

        let classification = analyzers.classifier.classify(content, context, None);

        let (rule_id, verdict, message) = match classification.injection_category() {
            InjectionCategory::SqlInjection => (
                "injection/sql",
                Verdict::TruePositive,
                format!(
                    "Potential SQL injection in {path} ({label}: {}). Security Smell: True Positive",
                    snippet(text)
                ),
            ),
            InjectionCategory::CodeInjection => (
                "injection/code",
                Verdict::TruePositive,
                format!(
                    "Potential code injection in {path} ({label}: {}). Security Smell: True Positive",
                    snippet(text)
                ),
            ),
            InjectionCategory::Sanitized => (
                "injection/sanitized",
                Verdict::FalsePositive,
                format!("Sanitized input detected in {path}. Security Smell: False Positive"),
            ),
            InjectionCategory::SecureHandling | InjectionCategory::Clean => (
                "injection/none",
                Verdict::TrueNegative,
                format!("No injection risk detected in {path}. Security Smell: True Negative"),
            ),
        };

        Some(Offense::new(
            resource,
            rule_id,
            Smell::InjectionRisk,
            verdict,
            message,
        ))
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "injection/sql",
            smell: Smell::InjectionRisk,
            verdict: Verdict::TruePositive,
            detector: "injection_risk",
            message: "SQL statement built from unescaped interpolation or concatenation",
            remediation: "Use bound parameters (?, :name, %(name)s) or a prepared statement",
        },
        RuleInfo {
            id: "injection/code",
            smell: Smell::InjectionRisk,
            verdict: Verdict::TruePositive,
            detector: "injection_risk",
            message: "Dynamic code or command construction (eval, exec, system, backticks, interpolation)",
            remediation: "Avoid interpolating input into commands; pass arguments explicitly and validate them",
        },
        RuleInfo {
            id: "injection/sanitized",
            smell: Smell::InjectionRisk,
            verdict: Verdict::FalsePositive,
            detector: "injection_risk",
            message: "Input is parameterized or escaped, so it only looks risky",
            remediation: "None needed",
        },
        RuleInfo {
            id: "injection/none",
            smell: Smell::InjectionRisk,
            verdict: Verdict::TrueNegative,
            detector: "injection_risk",
            message: "No injection construct detected",
            remediation: "None needed",
        },
    ]
}
