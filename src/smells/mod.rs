//! Pluggable smell detectors.
//!
//! Every detector implements the [`Detector`] trait and owns one smell
//! category (the exposure detector also reports insecure permissions, since
//! a permission verdict replaces its plain sensitivity finding). Detectors
//! emit at most one [`Offense`] per resource, so a resource never receives
//! contradictory verdicts for the same smell.
//!
//! Use [`all_detectors`] to obtain all registered detectors and [`all_rules`]
//! to list every rule they define.

pub mod injection;
pub mod insecure_source;
pub mod outdated_version;
pub mod sensitive_exposure;

use crate::engine::Analyzers;
use crate::offense::{Offense, Smell, Verdict};
use crate::resource::{Resource, ResourceKind};

/// A pluggable smell detector.
///
/// Implementers **must** be [`Send`] + [`Sync`] because
/// [`SmellEngine`](crate::engine::SmellEngine) runs detectors over resources
/// in parallel via [rayon].
///
/// # Implementing a custom detector
///
/// ```rust,ignore
/// use oxidized_iac_smells::smells::Detector;
///
/// pub struct MyDetector;
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str { "my_detector" }
///     fn description(&self) -> &'static str { "My custom detector" }
///     fn applies_to(&self, kind: ResourceKind) -> bool { kind == ResourceKind::File }
///     fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense> {
///         // ... detection logic ...
///         # todo!()
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique identifier, also the key of its `[smells]` config toggle.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Whether the detector has anything to say about this kind of resource.
    fn applies_to(&self, kind: ResourceKind) -> bool;

    /// Checks one resource. Returns `None` when an attribute the check needs
    /// is missing or unusable; the other detectors still run.
    fn check(&self, resource: &Resource, analyzers: &Analyzers) -> Option<Offense>;
}

/// Returns every registered [`Detector`], in report order.
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(outdated_version::OutdatedVersionDetector),
        Box::new(sensitive_exposure::SensitiveExposureDetector),
        Box::new(injection::InjectionDetector),
        Box::new(insecure_source::InsecureSourceDetector),
    ]
}

/// Metadata for a single rule.
///
/// Returned by [`all_rules`] and used by the `list-rules` and `explain`
/// CLI commands.
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"exposure/insecure-permissions"`).
    pub id: &'static str,
    pub smell: Smell,
    pub verdict: Verdict,
    /// Detector that raises this rule.
    pub detector: &'static str,
    pub message: &'static str,
    pub remediation: &'static str,
}

/// Aggregates [`RuleInfo`] from every detector module.
pub fn all_rules() -> Vec<RuleInfo> {
    let mut rules = Vec::new();
    rules.extend(outdated_version::rules());
    rules.extend(sensitive_exposure::rules());
    rules.extend(injection::rules());
    rules.extend(insecure_source::rules());
    rules
}

/// Trimmed content for use in a message, shortened to 120 characters.
pub(crate) fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > 120 {
        // Cut on a char boundary.
        let cut = trimmed
            .char_indices()
            .nth(117)
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        format!("{}...", &trimmed[..cut])
    } else {
        trimmed.to_string()
    }
}
