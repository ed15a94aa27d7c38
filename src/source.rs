//! Remote download source evaluation.
//!
//! Classifies the `source` URL of a remote download by transport and by
//! whether its host appears in the configured domain allowlist. The
//! allowlist is loaded once with the configuration; no lookup happens per
//! call.

use regex::Regex;
use std::sync::LazyLock;

// Scheme plus host (userinfo stripped, stops at path/query/fragment/port).
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([a-z][a-z0-9+.\-]*)://(?:[^@/?#\s]+@)?([^/?#:\s]*)").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceVerdict {
    /// Plain-text transport (`http`, `ftp`).
    InsecureTransport { scheme: String },
    /// Encrypted transport from an allowlisted host.
    Trusted { host: String },
    /// Encrypted transport from an unlisted host, pinned by a checksum.
    PinnedByChecksum { host: String },
    /// Encrypted transport from an unlisted host with no checksum.
    Untrusted { host: String },
    /// Local path or `file://` URL.
    Local,
}

#[derive(Debug, Clone)]
pub struct SourceEvaluator {
    domains: Vec<String>,
}

impl SourceEvaluator {
    /// `domains` are expected lowercase; empty entries are dropped so that
    /// they cannot match every host.
    pub fn new(domains: &[String]) -> Self {
        SourceEvaluator {
            domains: domains
                .iter()
                .filter(|d| !d.is_empty())
                .map(|d| d.to_lowercase())
                .collect(),
        }
    }

    /// Classifies `url`. `has_checksum` is whether the declaration pins the
    /// download with a checksum.
    ///
    /// ```
    /// use oxidized_iac_smells::source::{SourceEvaluator, SourceVerdict};
    ///
    /// let evaluator = SourceEvaluator::new(&["github.com".to_string()]);
    /// assert!(matches!(
    ///     evaluator.evaluate("http://example.com/pkg.tgz", false),
    ///     SourceVerdict::InsecureTransport { .. }
    /// ));
    /// assert!(matches!(
    ///     evaluator.evaluate("https://objects.github.com/pkg.tgz", false),
    ///     SourceVerdict::Trusted { .. }
    /// ));
    /// ```
    pub fn evaluate(&self, url: &str, has_checksum: bool) -> SourceVerdict {
        let Some(caps) = RE_URL.captures(url) else {
            return SourceVerdict::Local;
        };
        let scheme = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
        let host = caps.get(2).map_or("", |m| m.as_str()).to_lowercase();

        match scheme.as_str() {
            "http" | "ftp" => SourceVerdict::InsecureTransport { scheme },
            "https" | "ftps" | "sftp" | "s3" => {
                if self.is_allowed(&host) {
                    SourceVerdict::Trusted { host }
                } else if has_checksum {
                    SourceVerdict::PinnedByChecksum { host }
                } else {
                    SourceVerdict::Untrusted { host }
                }
            }
            "file" => SourceVerdict::Local,
            _ => {
                tracing::debug!(url, %scheme, "unrecognised scheme; treating source as untrusted");
                if has_checksum {
                    SourceVerdict::PinnedByChecksum { host }
                } else {
                    SourceVerdict::Untrusted { host }
                }
            }
        }
    }

    /// Exact match, or a subdomain of an allowlisted entry.
    pub fn is_allowed(&self, host: &str) -> bool {
        !host.is_empty()
            && self.domains.iter().any(|entry| {
                host == entry
                    || host
                        .strip_suffix(entry.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
    }
}
