//! Configuration loading and management.
//!
//! All tables live in a TOML file, `oxidized-iac-smells.toml` in the current
//! working directory by default. Every field has a default, so the file can
//! be omitted entirely.
//!
//! ```toml
//! max_permissions = 0o600
//! emit_true_negatives = true
//!
//! [latest_versions]
//! nginx = "1.26.3"
//! postgresql = "16.4"
//!
//! [patterns]
//! sanitized_markers = ["validated_input"]
//!
//! [allowlist]
//! domains = ["github.com", "artifacts.internal.example"]
//!
//! [smells]
//! insecure_source = false
//! ```
//!
//! The configuration is validated when a
//! [`SmellEngine`](crate::engine::SmellEngine) is built from it; an invalid
//! `max_permissions` or pattern fails there, before any resource is analysed.

use crate::classifier::{
    DEFAULT_BENIGN, DEFAULT_SAFE, DEFAULT_SECRET_FUNCTIONS, DEFAULT_SENSITIVE,
    DEFAULT_SENSITIVE_FILENAMES,
};
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "oxidized-iac-smells.toml";

/// Default upper bound for file modes.
pub const DEFAULT_MAX_PERMISSIONS: i64 = 0o600;

/// Main configuration for an analysis run.
///
/// # Examples
///
/// ```rust,no_run
/// use oxidized_iac_smells::config::Config;
///
/// // Load from the default location or fall back to built-in defaults.
/// let config = Config::load(None).unwrap();
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Most permissive file mode accepted for sensitive files. TOML octal
    /// literals (`0o600`) are the natural way to write it.
    pub max_permissions: i64,
    /// Whether True-Negative offenses are reported.
    pub emit_true_negatives: bool,
    /// Known latest version per package name.
    pub latest_versions: BTreeMap<String, String>,
    pub patterns: PatternsConfig,
    pub allowlist: AllowlistConfig,
    pub smells: SmellsConfig,
    /// When strict mode is enabled, False Positives fail the audit.
    pub strict: StrictConfig,
}

/// Pattern lists used by the [content classifier](crate::classifier).
///
/// Setting a list replaces its defaults rather than extending them.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Case-insensitive regexes marking content as sensitive.
    pub sensitive: Vec<String>,
    /// Case-insensitive regexes marking content as explicitly non-sensitive.
    pub benign: Vec<String>,
    /// Safe-parameterization regexes (`?`, `%(name)s`, `:name`, `prepare`).
    pub safe: Vec<String>,
    /// Function names whose call means a secret is fetched, not inlined.
    pub secret_functions: Vec<String>,
    /// Filename globs (basename, case-insensitive) that are sensitive.
    pub sensitive_filenames: Vec<String>,
    /// Interpolation tokens treated as already validated, e.g. `validated_input`.
    /// This is a naming convention only; nothing verifies the validation.
    pub sanitized_markers: Vec<String>,
}

/// Trusted download domains.
///
/// Entries are normalized to lowercase at load time via
/// [`AllowlistConfig::normalize`].
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    pub domains: Vec<String>,
}

/// Per-smell on/off toggles. Every smell defaults to **enabled**.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SmellsConfig {
    pub outdated_version: bool,
    /// Covers both sensitive exposure and insecure permissions.
    pub sensitive_exposure: bool,
    pub injection_risk: bool,
    pub insecure_source: bool,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    pub enabled: bool,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_permissions: DEFAULT_MAX_PERMISSIONS,
            emit_true_negatives: true,
            latest_versions: BTreeMap::from([
                ("nginx".to_string(), "1.26.3".to_string()),
                ("apache".to_string(), "2.4.57".to_string()),
                ("mysql".to_string(), "8.0.4".to_string()),
            ]),
            patterns: PatternsConfig::default(),
            allowlist: AllowlistConfig::default(),
            smells: SmellsConfig::default(),
            strict: StrictConfig::default(),
        }
    }
}

impl Default for PatternsConfig {
    fn default() -> Self {
        PatternsConfig {
            sensitive: strings(DEFAULT_SENSITIVE),
            benign: strings(DEFAULT_BENIGN),
            safe: strings(DEFAULT_SAFE),
            secret_functions: strings(DEFAULT_SECRET_FUNCTIONS),
            sensitive_filenames: strings(DEFAULT_SENSITIVE_FILENAMES),
            sanitized_markers: Vec::new(),
        }
    }
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        AllowlistConfig {
            domains: strings(&[
                "github.com",
                "githubusercontent.com",
                "pypi.org",
                "files.pythonhosted.org",
                "registry.npmjs.org",
                "rubygems.org",
                "supermarket.chef.io",
            ]),
        }
    }
}

impl AllowlistConfig {
    /// Normalizes all entries to lowercase in-place.
    pub fn normalize(&mut self) {
        for s in &mut self.domains {
            *s = s.trim().to_lowercase();
        }
    }
}

impl Default for SmellsConfig {
    fn default() -> Self {
        SmellsConfig {
            outdated_version: true,
            sensitive_exposure: true,
            injection_risk: true,
            insecure_source: true,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the explicit path does not exist, the
    /// file cannot be read, or the TOML fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            tracing::debug!("no config file found; using defaults");
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config = Config::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.allowlist.normalize();
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Config, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.allowlist.normalize();
        Ok(config)
    }

    /// Returns `max_permissions` as a file mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxPermissions`] for negative values or
    /// values wider than `0o7777`.
    pub fn max_permissions_mode(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.max_permissions)
            .ok()
            .filter(|mode| *mode <= 0o7777)
            .ok_or(ConfigError::InvalidMaxPermissions(self.max_permissions))
    }

    /// Overrides `max_permissions` from an octal string such as `0644`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnparsableMaxPermissions`] when `value` is not octal.
    pub fn set_max_permissions(&mut self, value: &str) -> Result<(), ConfigError> {
        let digits = value.trim();
        let digits = digits.strip_prefix("0o").unwrap_or(digits);
        self.max_permissions = i64::from_str_radix(digits, 8)
            .map_err(|_| ConfigError::UnparsableMaxPermissions(value.to_string()))?;
        Ok(())
    }

    /// Returns `true` if the named smell detector is enabled.
    ///
    /// Unknown names are considered enabled.
    ///
    /// ```
    /// use oxidized_iac_smells::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.is_smell_enabled("injection_risk"));
    /// assert!(config.is_smell_enabled("unknown_smell"));
    /// ```
    pub fn is_smell_enabled(&self, name: &str) -> bool {
        match name {
            "outdated_version" => self.smells.outdated_version,
            "sensitive_exposure" => self.smells.sensitive_exposure,
            "injection_risk" => self.smells.injection_risk,
            "insecure_source" => self.smells.insecure_source,
            _ => true,
        }
    }
}
