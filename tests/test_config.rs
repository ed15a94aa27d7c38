use oxidized_iac_smells::config::{Config, DEFAULT_MAX_PERMISSIONS};
use oxidized_iac_smells::error::ConfigError;
use std::path::Path;

#[test]
fn defaults_are_complete() {
    let config = Config::default();
    assert_eq!(config.max_permissions, DEFAULT_MAX_PERMISSIONS);
    assert_eq!(config.max_permissions_mode().unwrap(), 0o600);
    assert!(config.emit_true_negatives);
    assert_eq!(
        config.latest_versions.get("nginx").map(String::as_str),
        Some("1.26.3")
    );
    assert!(config.patterns.sanitized_markers.is_empty());
    assert!(!config.strict.enabled);
    for smell in [
        "outdated_version",
        "sensitive_exposure",
        "injection_risk",
        "insecure_source",
    ] {
        assert!(config.is_smell_enabled(smell), "{smell}");
    }
}

#[test]
fn empty_toml_gives_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.max_permissions, 0o600);
    assert!(!config.patterns.sensitive.is_empty());
    assert!(!config.allowlist.domains.is_empty());
}

#[test]
fn toml_octal_literal_sets_max_permissions() {
    let config = Config::from_toml("max_permissions = 0o644").unwrap();
    assert_eq!(config.max_permissions_mode().unwrap(), 0o644);
}

#[test]
fn partial_tables_keep_other_defaults() {
    let config = Config::from_toml(
        r#"
emit_true_negatives = false

[latest_versions]
postgresql = "16.4"

[smells]
insecure_source = false

[patterns]
sanitized_markers = ["validated_input"]
"#,
    )
    .unwrap();

    assert!(!config.emit_true_negatives);
    assert_eq!(config.latest_versions.len(), 1);
    assert!(!config.is_smell_enabled("insecure_source"));
    assert!(config.is_smell_enabled("outdated_version"));
    assert_eq!(config.patterns.sanitized_markers, vec!["validated_input"]);
    assert!(!config.patterns.secret_functions.is_empty());
}

#[test]
fn allowlist_is_normalized_to_lowercase() {
    let config = Config::from_toml(
        r#"
[allowlist]
domains = [" Artifacts.Example.COM "]
"#,
    )
    .unwrap();
    assert_eq!(config.allowlist.domains, vec!["artifacts.example.com"]);
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(Config::from_toml("max_permissions = \"wide open").is_err());
    assert!(Config::from_toml("max_permissions = \"0644\"").is_err());
}

#[test]
fn out_of_range_max_permissions_is_rejected() {
    for value in [-1, 0o10000] {
        let config = Config {
            max_permissions: value,
            ..Config::default()
        };
        assert!(matches!(
            config.max_permissions_mode(),
            Err(ConfigError::InvalidMaxPermissions(v)) if v == value
        ));
    }
}

#[test]
fn set_max_permissions_parses_octal_strings() {
    let mut config = Config::default();
    config.set_max_permissions("0644").unwrap();
    assert_eq!(config.max_permissions_mode().unwrap(), 0o644);

    config.set_max_permissions("0o400").unwrap();
    assert_eq!(config.max_permissions_mode().unwrap(), 0o400);

    assert!(matches!(
        config.set_max_permissions("rw-------"),
        Err(ConfigError::UnparsableMaxPermissions(_))
    ));
    assert!(config.set_max_permissions("0900").is_err());
}

#[test]
fn load_reads_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smells.toml");
    std::fs::write(&path, "max_permissions = 0o640\n[strict]\nenabled = true\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.max_permissions_mode().unwrap(), 0o640);
    assert!(config.strict.enabled);
}

#[test]
fn load_missing_explicit_file_is_not_found() {
    let err = Config::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
    assert!(err.to_string().contains("does/not/exist.toml"));
}

#[test]
fn load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[smells\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
