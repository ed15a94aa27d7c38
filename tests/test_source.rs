use oxidized_iac_smells::source::{SourceEvaluator, SourceVerdict};

fn evaluator() -> SourceEvaluator {
    SourceEvaluator::new(&[
        "github.com".to_string(),
        "releases.example.org".to_string(),
    ])
}

#[test]
fn plain_http_is_insecure_transport() {
    assert_eq!(
        evaluator().evaluate("http://insecure-source.com/file.tar.gz", false),
        SourceVerdict::InsecureTransport {
            scheme: "http".to_string()
        }
    );
}

#[test]
fn insecure_transport_ignores_checksum_and_allowlist() {
    assert!(matches!(
        evaluator().evaluate("HTTP://github.com/a.tgz", true),
        SourceVerdict::InsecureTransport { .. }
    ));
    assert!(matches!(
        evaluator().evaluate("ftp://github.com/a.tgz", false),
        SourceVerdict::InsecureTransport { .. }
    ));
}

#[test]
fn allowlisted_https_host_is_trusted() {
    assert_eq!(
        evaluator().evaluate("https://github.com/org/repo/archive.tgz", false),
        SourceVerdict::Trusted {
            host: "github.com".to_string()
        }
    );
}

#[test]
fn subdomain_of_allowlisted_host_is_trusted() {
    assert!(matches!(
        evaluator().evaluate("https://objects.github.com/x.tgz", false),
        SourceVerdict::Trusted { .. }
    ));
}

#[test]
fn lookalike_host_is_not_trusted() {
    assert!(matches!(
        evaluator().evaluate("https://evilgithub.com/x.tgz", false),
        SourceVerdict::Untrusted { .. }
    ));
    assert!(matches!(
        evaluator().evaluate("https://github.com.evil.net/x.tgz", false),
        SourceVerdict::Untrusted { .. }
    ));
}

#[test]
fn host_is_extracted_past_userinfo_and_port() {
    assert_eq!(
        evaluator().evaluate("https://user:pw@GitHub.com:8443/x.tgz", false),
        SourceVerdict::Trusted {
            host: "github.com".to_string()
        }
    );
}

#[test]
fn unlisted_host_with_checksum_is_pinned() {
    assert_eq!(
        evaluator().evaluate("https://trusted-source.com/file.tar.gz", true),
        SourceVerdict::PinnedByChecksum {
            host: "trusted-source.com".to_string()
        }
    );
}

#[test]
fn unlisted_host_without_checksum_is_untrusted() {
    assert_eq!(
        evaluator().evaluate("https://verified-source.com/file.tar.gz", false),
        SourceVerdict::Untrusted {
            host: "verified-source.com".to_string()
        }
    );
}

#[test]
fn local_sources_are_local() {
    assert_eq!(
        evaluator().evaluate("file:///opt/pkgs/app.tgz", false),
        SourceVerdict::Local
    );
    assert_eq!(
        evaluator().evaluate("/opt/pkgs/app.tgz", false),
        SourceVerdict::Local
    );
}

#[test]
fn empty_allowlist_trusts_nothing() {
    let evaluator = SourceEvaluator::new(&[String::new()]);
    assert!(!evaluator.is_allowed("github.com"));
    assert!(!evaluator.is_allowed(""));
}

#[test]
fn allowlist_entries_are_case_insensitive() {
    let evaluator = SourceEvaluator::new(&["GitHub.com".to_string()]);
    assert!(evaluator.is_allowed("github.com"));
}
