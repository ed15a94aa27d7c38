use std::cmp::Ordering;
use std::collections::BTreeMap;

use oxidized_iac_smells::oracle::{compare_versions, VersionOracle, VersionStatus};

fn oracle() -> VersionOracle {
    VersionOracle::new(BTreeMap::from([
        ("nginx".to_string(), "1.26.3".to_string()),
        ("mysql".to_string(), "8.0.4".to_string()),
        ("redis".to_string(), "latest".to_string()),
        ("broken".to_string(), "1.x".to_string()),
    ]))
}

#[test]
fn older_version_is_outdated() {
    assert!(oracle().is_outdated("nginx", "1.14.0"));
    assert!(oracle().is_outdated("nginx", "1.20.4"));
    assert!(oracle().is_outdated("mysql", "8.0.1"));
}

#[test]
fn equal_or_newer_version_is_not_outdated() {
    assert!(!oracle().is_outdated("nginx", "1.26.3"));
    assert!(!oracle().is_outdated("nginx", "1.27.0"));
    assert!(!oracle().is_outdated("nginx", "2"));
}

#[test]
fn latest_sentinel_is_never_outdated() {
    for package in ["nginx", "mysql", "redis", "unknown"] {
        assert!(!oracle().is_outdated(package, "latest"));
        assert_eq!(oracle().check(package, "latest"), VersionStatus::Latest);
    }
}

#[test]
fn untracked_package_has_no_opinion() {
    assert_eq!(oracle().check("python", "2.7.18"), VersionStatus::Unknown);
    assert!(!oracle().is_outdated("python", "0.0.1"));
}

#[test]
fn latest_baseline_is_not_compared() {
    assert_eq!(oracle().check("redis", "1.0.0"), VersionStatus::Unknown);
}

#[test]
fn malformed_versions_degrade_to_not_outdated() {
    assert!(matches!(
        oracle().check("nginx", "1.14.0-rc1"),
        VersionStatus::Incomparable { .. }
    ));
    assert!(matches!(
        oracle().check("broken", "0.1"),
        VersionStatus::Incomparable { .. }
    ));
    assert!(!oracle().is_outdated("nginx", "one.two"));
    assert!(!oracle().is_outdated("nginx", ""));
}

#[test]
fn outdated_status_carries_the_baseline() {
    assert_eq!(
        oracle().check("nginx", "1.14.0"),
        VersionStatus::Outdated {
            latest: "1.26.3".to_string()
        }
    );
}

#[test]
fn comparison_is_numeric_not_lexical() {
    assert_eq!(compare_versions("1.10.0", "1.9.0"), Some(Ordering::Greater));
    assert_eq!(compare_versions("3.9.7", "3.10.4"), Some(Ordering::Less));
}

#[test]
fn shorter_versions_are_zero_padded() {
    assert_eq!(compare_versions("8.0", "8.0.0"), Some(Ordering::Equal));
    assert_eq!(compare_versions("8", "8.0.4"), Some(Ordering::Less));
    assert_eq!(compare_versions("8.0.4.1", "8.0.4"), Some(Ordering::Greater));
}

#[test]
fn empty_components_are_malformed() {
    assert_eq!(compare_versions("1..2", "1.2"), None);
    assert_eq!(compare_versions("1.2.", "1.2"), None);
}
