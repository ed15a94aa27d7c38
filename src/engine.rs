//! Smell engine.
//!
//! Owns the read-only analysers built from a [`Config`] and dispatches each
//! resource to the enabled [`Detector`]s. Analysis of one resource never
//! depends on another, so resources are processed in parallel via [rayon];
//! the collected offenses are then sorted by source location so that two
//! runs over the same input produce identical output.

use crate::classifier::ContentClassifier;
use crate::config::Config;
use crate::declaration::Declaration;
use crate::error::ConfigError;
use crate::extract::extract;
use crate::offense::{Offense, Verdict};
use crate::oracle::VersionOracle;
use crate::permissions::PermissionEvaluator;
use crate::resource::Resource;
use crate::smells::{self, Detector};
use crate::source::SourceEvaluator;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// The shared, immutable analysers handed to every detector.
#[derive(Debug, Clone)]
pub struct Analyzers {
    pub oracle: VersionOracle,
    pub classifier: ContentClassifier,
    pub permissions: PermissionEvaluator,
    pub sources: SourceEvaluator,
}

impl Analyzers {
    /// Builds all analysers from `config`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid `max_permissions` or a pattern that does not compile.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Analyzers {
            oracle: VersionOracle::new(config.latest_versions.clone()),
            classifier: ContentClassifier::new(&config.patterns)?,
            permissions: PermissionEvaluator::new(config.max_permissions_mode()?),
            sources: SourceEvaluator::new(&config.allowlist.domains),
        })
    }
}

/// Result of analysing a batch of declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Number of declarations that were recognised as resources.
    pub resources: usize,
    pub offenses: Vec<Offense>,
}

pub struct SmellEngine {
    analyzers: Analyzers,
    detectors: Vec<Box<dyn Detector>>,
    emit_true_negatives: bool,
}

impl SmellEngine {
    /// Builds an engine, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] before any resource is processed when the
    /// configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxidized_iac_smells::config::Config;
    /// use oxidized_iac_smells::engine::SmellEngine;
    /// use oxidized_iac_smells::offense::Verdict;
    /// use oxidized_iac_smells::resource::{Location, Resource, ResourceKind, Value, VERSION};
    ///
    /// let engine = SmellEngine::new(&Config::default()).unwrap();
    /// let nginx = Resource::new(ResourceKind::Package, "nginx", Location::default())
    ///     .with_attribute(VERSION, Value::Literal("1.14.0".into()));
    ///
    /// let offenses = engine.analyze_resource(&nginx);
    /// assert_eq!(offenses[0].verdict, Verdict::TruePositive);
    /// ```
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let analyzers = Analyzers::from_config(config)?;
        let detectors: Vec<Box<dyn Detector>> = smells::all_detectors()
            .into_iter()
            .filter(|d| config.is_smell_enabled(d.name()))
            .collect();

        tracing::debug!(
            detectors = ?detectors.iter().map(|d| d.name()).collect::<Vec<_>>(),
            max_permissions = format_args!("{:04o}", analyzers.permissions.max()),
            "smell engine ready"
        );

        Ok(SmellEngine {
            analyzers,
            detectors,
            emit_true_negatives: config.emit_true_negatives,
        })
    }

    /// Runs every applicable detector against one resource.
    pub fn analyze_resource(&self, resource: &Resource) -> Vec<Offense> {
        self.detectors
            .iter()
            .filter(|d| d.applies_to(resource.kind))
            .filter_map(|d| d.check(resource, &self.analyzers))
            .filter(|o| self.emit_true_negatives || o.verdict != Verdict::TrueNegative)
            .collect()
    }

    /// Analyses resources in parallel and returns offenses in a stable order.
    pub fn analyze_resources(&self, resources: &[Resource]) -> Vec<Offense> {
        let never = AtomicBool::new(false);
        self.analyze_with_cancel(resources, &never)
    }

    /// Like [`analyze_resources`](Self::analyze_resources), but stops
    /// dispatching further resources once `cancel` is set. Offenses for
    /// resources that were already analysed are still returned.
    pub fn analyze_with_cancel(&self, resources: &[Resource], cancel: &AtomicBool) -> Vec<Offense> {
        let mut offenses: Vec<Offense> = resources
            .par_iter()
            .flat_map_iter(|resource| {
                if cancel.load(Ordering::Relaxed) {
                    Vec::new()
                } else {
                    self.analyze_resource(resource)
                }
            })
            .collect();

        sort_offenses(&mut offenses);
        offenses
    }

    /// Extracts resources from parsed declarations and analyses them.
    /// Unrecognised declarations are skipped.
    pub fn analyze<D: Declaration + Sync>(&self, nodes: &[D]) -> Analysis {
        let resources: Vec<Resource> = nodes.par_iter().filter_map(|n| extract(n)).collect();
        tracing::debug!(
            declarations = nodes.len(),
            resources = resources.len(),
            "extracted resources"
        );

        let offenses = self.analyze_resources(&resources);
        Analysis {
            resources: resources.len(),
            offenses,
        }
    }
}

/// Orders offenses by location, then resource identifier, then smell.
/// The sort is stable, so equal keys keep their input order.
pub fn sort_offenses(offenses: &mut [Offense]) {
    offenses.sort_by(|a, b| {
        a.resource
            .location
            .cmp(&b.resource.location)
            .then_with(|| a.resource.identifier.cmp(&b.resource.identifier))
            .then_with(|| a.smell.cmp(&b.smell))
    });
}
