//! Version oracle.
//!
//! Holds the known-latest version of each tracked package and answers
//! whether a declared version is older. Versions are compared as dotted
//! numeric sequences; anything that is not (e.g. `1.2.3-rc1`) is treated as
//! incomparable rather than as an error.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sentinel version that is never compared numerically.
pub const LATEST: &str = "latest";

/// Outcome of checking a declared package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    /// The declaration pins the `latest` sentinel.
    Latest,
    /// The declared version is strictly older than the known latest.
    Outdated { latest: String },
    /// The declared version is at or beyond the known latest.
    Current { latest: String },
    /// No baseline: the package is not tracked, or its baseline is `latest`.
    Unknown,
    /// One of the two versions is not a dotted numeric string.
    Incomparable { latest: String },
}

/// Read-only table of package name → known latest version.
#[derive(Debug, Clone, Default)]
pub struct VersionOracle {
    latest: BTreeMap<String, String>,
}

impl VersionOracle {
    pub fn new(latest: BTreeMap<String, String>) -> Self {
        VersionOracle { latest }
    }

    /// Returns the known latest version for `package`, if tracked.
    pub fn latest_for(&self, package: &str) -> Option<&str> {
        self.latest.get(package).map(String::as_str)
    }

    /// Classifies `current` against the known latest version of `package`.
    pub fn check(&self, package: &str, current: &str) -> VersionStatus {
        if current.trim() == LATEST {
            return VersionStatus::Latest;
        }

        let Some(latest) = self.latest_for(package) else {
            return VersionStatus::Unknown;
        };
        if latest.trim() == LATEST {
            return VersionStatus::Unknown;
        }

        match compare_versions(current, latest) {
            Some(Ordering::Less) => VersionStatus::Outdated {
                latest: latest.to_string(),
            },
            Some(_) => VersionStatus::Current {
                latest: latest.to_string(),
            },
            None => {
                tracing::debug!(
                    package,
                    current,
                    latest,
                    "version is not dotted-numeric; skipping comparison"
                );
                VersionStatus::Incomparable {
                    latest: latest.to_string(),
                }
            }
        }
    }

    /// Returns `true` when `current` is strictly older than the known latest
    /// version of `package`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use oxidized_iac_smells::oracle::VersionOracle;
    ///
    /// let oracle = VersionOracle::new(BTreeMap::from([
    ///     ("nginx".to_string(), "1.26.3".to_string()),
    /// ]));
    /// assert!(oracle.is_outdated("nginx", "1.14.0"));
    /// assert!(!oracle.is_outdated("nginx", "1.27.0"));
    /// assert!(!oracle.is_outdated("nginx", "latest"));
    /// assert!(!oracle.is_outdated("redis", "1.0"));
    /// ```
    pub fn is_outdated(&self, package: &str, current: &str) -> bool {
        matches!(self.check(package, current), VersionStatus::Outdated { .. })
    }
}

/// Compares two dotted numeric versions component by component, padding the
/// shorter one with zeros. Returns `None` if either is malformed.
///
/// ```
/// use std::cmp::Ordering;
/// use oxidized_iac_smells::oracle::compare_versions;
///
/// assert_eq!(compare_versions("1.2", "1.2.0"), Some(Ordering::Equal));
/// assert_eq!(compare_versions("1.10", "1.9"), Some(Ordering::Greater));
/// assert_eq!(compare_versions("1.x", "1.9"), None);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_components(a)?;
    let b = parse_components(b)?;

    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

fn parse_components(version: &str) -> Option<Vec<u64>> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse::<u64>().ok()
            }
        })
        .collect()
}
