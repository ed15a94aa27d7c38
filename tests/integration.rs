use assert_cmd::Command;
use predicates::prelude::*;

fn oxidized_iac_smells() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("oxidized-iac-smells")
}

#[test]
fn audit_clean_recipe_passes() {
    oxidized_iac_smells()
        .args(["audit", "tests/fixtures/clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn audit_cookbook_fails() {
    oxidized_iac_smells()
        .args(["audit", "tests/fixtures/cookbook_oracle.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn audit_cookbook_json_format() {
    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/cookbook_oracle.json",
            "--format",
            "json",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"passed\": false"))
        .stdout(predicate::str::contains("exposure/insecure-permissions"));
}

#[test]
fn audit_cookbook_sarif_format() {
    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/cookbook_oracle.json",
            "--format",
            "sarif",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""));
}

#[test]
fn audit_directory_reads_every_dump() {
    let output = oxidized_iac_smells()
        .args(["audit", "tests/fixtures", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // 30 + 6 + 3 + 3 + 4 recognised resources across the fixture dumps
    assert_eq!(parsed["resources_analyzed"], 46);
}

#[test]
fn audit_nonexistent_path_exits_2() {
    oxidized_iac_smells()
        .args(["audit", "tests/fixtures/does-not-exist"])
        .assert()
        .code(2);
}

#[test]
fn audit_directory_without_dumps_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    oxidized_iac_smells()
        .args(["audit", dir.path().to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No declaration dumps"));
}

#[test]
fn audit_malformed_dump_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("broken.json");
    std::fs::write(&dump, "{\"declarations\": [").unwrap();

    oxidized_iac_smells()
        .args(["audit", dump.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse declarations"));
}

#[test]
fn false_positives_only_warns_and_passes() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("latest.json");
    std::fs::write(
        &dump,
        r#"[{"type": "package", "name": {"str": "nginx"}, "line": 1,
             "body": [{"method": "version", "args": [{"str": "latest"}]}]}]"#,
    )
    .unwrap();

    oxidized_iac_smells()
        .args(["audit", dump.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn strict_mode_fails_on_false_positives() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("latest.json");
    std::fs::write(
        &dump,
        r#"[{"type": "package", "name": {"str": "nginx"}, "line": 1,
             "body": [{"method": "version", "args": [{"str": "latest"}]}]}]"#,
    )
    .unwrap();

    oxidized_iac_smells()
        .args(["audit", dump.to_str().unwrap(), "--strict"])
        .assert()
        .code(1);
}

#[test]
fn max_permissions_flag_is_applied() {
    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/sensitive_information.json",
            "--format",
            "json",
            "--max-permissions",
            "0644",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("exposure/sensitive"))
        .stdout(predicate::str::contains("exposure/insecure-permissions").not());
}

#[test]
fn invalid_max_permissions_exits_2() {
    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/clean",
            "--max-permissions",
            "rw-r--r--",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid max_permissions"));
}

#[test]
fn config_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("smells.toml");
    std::fs::write(
        &config,
        "[patterns]\nsanitized_markers = [\"validated_input\"]\n\n[allowlist]\ndomains = [\"trusted-source.com\", \"verified-source.com\"]\n",
    )
    .unwrap();

    let output = oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/cookbook_oracle.json",
            "--format",
            "json",
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // validated_input becomes a false positive; two downloads become trusted
    assert_eq!(parsed["summary"]["true_positives"], 7);
    assert_eq!(parsed["summary"]["false_positives"], 4);
}

#[test]
fn missing_config_file_exits_2() {
    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/clean",
            "--config",
            "does-not-exist.toml",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("report.json");

    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/cookbook_oracle.json",
            "--format",
            "json",
            "--output",
            output_file.to_str().unwrap(),
        ])
        .assert()
        .code(1);

    let content = std::fs::read_to_string(&output_file).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("Output file should contain valid JSON");
    assert!(!parsed["passed"].as_bool().unwrap());
}

#[test]
fn list_rules_shows_rules() {
    oxidized_iac_smells()
        .args(["list-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version/outdated"))
        .stdout(predicate::str::contains("exposure/insecure-permissions"))
        .stdout(predicate::str::contains("injection/sql"))
        .stdout(predicate::str::contains("source/insecure-transport"));
}

#[test]
fn explain_known_rule() {
    oxidized_iac_smells()
        .args(["explain", "exposure/insecure-permissions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exposure/insecure-permissions"))
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_unknown_rule_exits_2() {
    oxidized_iac_smells()
        .args(["explain", "nonexistent/rule"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule"));
}

#[test]
fn pretty_output_to_file_has_no_color_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("report.txt");

    oxidized_iac_smells()
        .args([
            "audit",
            "tests/fixtures/cookbook_oracle.json",
            "--output",
            output_file.to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("FAILED"));
    assert!(!content.contains('\u{1b}'));
}
