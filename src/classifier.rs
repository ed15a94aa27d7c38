//! Content classification.
//!
//! Runs ordered heuristics over file content, commands, and script bodies.
//! Each heuristic sets one flag on a [`Classification`]; the precedence
//! between flags is applied by [`Classification::injection_category`] and
//! [`Classification::exposure_category`]:
//!
//! | Order | Signal | Source |
//! |-------|--------|--------|
//! | 1 | Secure handling | call to a secret-retrieval function (`vault(`, `data_bag(`, …) |
//! | 2 | SQL injection | SQL keyword + unsafe construction + no safe parameterization |
//! | 2 | Code injection | `eval(`, `exec(`, `system(`, backticks, `${…}`, `<%= … %>` |
//! | 3 | Sanitized input | safe parameterization or an escape/sanitize/quote call |
//! | 4 | Sensitive | sensitive keyword in content, or sensitive filename glob |
//! | 5 | Benign marker | `env=`, `production`, `staging`, … |
//!
//! Secure handling clears every other flag. Detection is pattern based; it
//! does not track data flow.

use crate::config::PatternsConfig;
use crate::error::ConfigError;
use crate::resource::Value;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

// SQL context

static RE_SQL_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|EXEC)\b").unwrap());

static RE_SQL_CONCAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]\s*\+\s*[^;]+;"#).unwrap());

static RE_SQL_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]\s*\{\{[^}]*\}\}"#).unwrap());

static RE_SQL_TEMPLATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]\s*<\s*%=?[^%]*%>"#).unwrap());

static RE_SQL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]\s*\.format\([^)]*\)"#).unwrap());

// Generic code / command injection

static RE_EVAL_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\beval\s*\(").unwrap());

static RE_EXEC_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bexec\s*\(").unwrap());

static RE_SYSTEM_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bsystem\s*\(").unwrap());

static RE_BACKTICK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());

static RE_SHELL_SUBST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{[^}]+\}").unwrap());

static RE_TEMPLATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*%=?[^%]*%>").unwrap());

// Captures the token inside `{{ … }}` so configured sanitized markers can be exempted.
static RE_INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]*?)\s*\}\}").unwrap());

static RE_ESCAPE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(escape|sanitize|quote)\(").unwrap());

/// Unsafe SQL construction patterns, in precedence order.
static UNSAFE_SQL: &[(&str, &LazyLock<Regex>)] = &[
    ("string-concatenation", &RE_SQL_CONCAT),
    ("template-interpolation", &RE_SQL_TEMPLATE),
    ("templated-tag", &RE_SQL_TEMPLATE_TAG),
    ("shell-substitution", &RE_SHELL_SUBST),
    ("string-format", &RE_SQL_FORMAT),
    ("exec-call", &RE_EXEC_CALL),
    ("eval-call", &RE_EVAL_CALL),
];

/// Generic code injection patterns, in precedence order.
static CODE_INJECTION: &[(&str, &LazyLock<Regex>)] = &[
    ("eval-call", &RE_EVAL_CALL),
    ("exec-call", &RE_EXEC_CALL),
    ("system-call", &RE_SYSTEM_CALL),
    ("backtick", &RE_BACKTICK),
    ("shell-substitution", &RE_SHELL_SUBST),
    ("templated-tag", &RE_TEMPLATE_TAG),
];

/// Default sensitive keywords.
pub const DEFAULT_SENSITIVE: &[&str] = &[
    "password",
    "secret",
    "key",
    "token",
    "credential",
    "private",
    "rsa",
    "dsa",
    "ssh",
];

/// Default non-sensitive markers.
pub const DEFAULT_BENIGN: &[&str] = &["env=", "production", "development", "staging", "test"];

/// Default safe-parameterization patterns.
pub const DEFAULT_SAFE: &[&str] = &[r"\?", r"%\([^)]+\)s", r":[a-z0-9_]+", r"(?i)\bprepare\b"];

/// Default secret-retrieval functions.
pub const DEFAULT_SECRET_FUNCTIONS: &[&str] =
    &["vault", "data_bag", "data_bag_item", "chef_vault_item", "secret"];

/// Default sensitive filename globs, matched case-insensitively against the basename.
pub const DEFAULT_SENSITIVE_FILENAMES: &[&str] = &[
    "secret*", "*.pem", "*.key", "*config*", "id_rsa*", "*.p12", ".env*",
];

/// An ordered list of named matchers. The first match wins.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(String, Regex)>,
}

impl PatternSet {
    /// Compiles `patterns` in order. Each entry is named after its source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] naming `list` and the
    /// offending pattern.
    pub fn compile<S: AsRef<str>>(
        list: &'static str,
        patterns: &[S],
        case_insensitive: bool,
    ) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                RegexBuilder::new(p)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map(|re| (p.to_string(), re))
                    .map_err(|source| ConfigError::InvalidPattern {
                        list,
                        pattern: p.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternSet { patterns })
    }

    /// Builds a set from shell-style globs (`*`, `?`), anchored to the whole input.
    pub fn from_globs<S: AsRef<str>>(list: &'static str, globs: &[S]) -> Result<Self, ConfigError> {
        let mut patterns = Vec::with_capacity(globs.len());
        for glob in globs {
            let glob = glob.as_ref();
            let mut source = String::from("^");
            for c in glob.chars() {
                match c {
                    '*' => source.push_str(".*"),
                    '?' => source.push('.'),
                    c => source.push_str(&regex::escape(&c.to_string())),
                }
            }
            source.push('$');
            let re = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    list,
                    pattern: glob.to_string(),
                    source,
                })?;
            patterns.push((glob.to_string(), re));
        }
        Ok(PatternSet { patterns })
    }

    /// Returns the name of the first pattern matching `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Where the classified text will end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentContext {
    /// Written to disk as file content.
    File,
    /// Handed to a shell or interpreter. Template interpolation `{{ … }}`
    /// counts as injection here.
    Command,
}

/// Flags raised by the classifier for one piece of content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub secure_handling: bool,
    pub sql_injection: bool,
    pub code_injection: bool,
    pub sanitized: bool,
    pub sensitive_content: bool,
    pub sensitive_filename: bool,
    pub benign_marker: bool,
}

/// The deciding signal for the injection smell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionCategory {
    SecureHandling,
    SqlInjection,
    CodeInjection,
    Sanitized,
    Clean,
}

/// The deciding signal for the exposure smell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureCategory {
    SecureHandling,
    Sensitive,
    Benign,
    Clean,
}

impl Classification {
    pub fn injection_risk(&self) -> bool {
        self.sql_injection || self.code_injection
    }

    /// Sensitive content or a sensitive filename.
    pub fn sensitive(&self) -> bool {
        self.sensitive_content || self.sensitive_filename
    }

    pub fn injection_category(&self) -> InjectionCategory {
        if self.secure_handling {
            InjectionCategory::SecureHandling
        } else if self.injection_risk() {
            if self.sql_injection {
                InjectionCategory::SqlInjection
            } else {
                InjectionCategory::CodeInjection
            }
        } else if self.sanitized {
            InjectionCategory::Sanitized
        } else {
            InjectionCategory::Clean
        }
    }

    pub fn exposure_category(&self) -> ExposureCategory {
        if self.secure_handling {
            ExposureCategory::SecureHandling
        } else if self.sensitive() {
            ExposureCategory::Sensitive
        } else if self.benign_marker {
            ExposureCategory::Benign
        } else {
            ExposureCategory::Clean
        }
    }
}

/// Compiled, read-only classifier. Built once per engine.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    sensitive: PatternSet,
    benign: PatternSet,
    safe: PatternSet,
    sensitive_filenames: PatternSet,
    secret_call: Option<Regex>,
    sanitized_markers: Vec<String>,
}

impl ContentClassifier {
    /// Compiles the configured pattern lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when a configured regex does
    /// not compile.
    pub fn new(patterns: &PatternsConfig) -> Result<Self, ConfigError> {
        let sensitive = PatternSet::compile("sensitive", &patterns.sensitive, true)?;
        let benign = PatternSet::compile("benign", &patterns.benign, true)?;
        // Bound parameters (`:name`) are case-sensitive, so only the configured flags apply.
        let safe = PatternSet::compile("safe", &patterns.safe, false)?;
        let sensitive_filenames =
            PatternSet::from_globs("sensitive_filenames", &patterns.sensitive_filenames)?;

        let secret_call = if patterns.secret_functions.is_empty() {
            None
        } else {
            let names: Vec<String> = patterns
                .secret_functions
                .iter()
                .map(|f| regex::escape(f))
                .collect();
            let source = format!(r"\b(?:{})\s*\(", names.join("|"));
            Some(
                Regex::new(&source).map_err(|source| ConfigError::InvalidPattern {
                    list: "secret_functions",
                    pattern: names.join("|"),
                    source,
                })?,
            )
        };

        if sensitive_filenames.is_empty() {
            tracing::debug!("no sensitive filename globs configured; filename checks disabled");
        }
        tracing::debug!(
            sensitive = sensitive.len(),
            benign = benign.len(),
            safe = safe.len(),
            filenames = sensitive_filenames.len(),
            "content classifier compiled"
        );

        Ok(ContentClassifier {
            sensitive,
            benign,
            safe,
            sensitive_filenames,
            secret_call,
            sanitized_markers: patterns.sanitized_markers.clone(),
        })
    }

    /// Classifies `content` for the given context. `filename` is the basename
    /// of the target file, when there is one.
    pub fn classify(
        &self,
        content: &Value,
        context: ContentContext,
        filename: Option<&str>,
    ) -> Classification {
        let sensitive_filename = filename.is_some_and(|f| self.is_sensitive_filename(f));

        let Some(text) = content.text() else {
            return Classification {
                sensitive_filename,
                ..Classification::default()
            };
        };

        if self.is_secure_handling(text) {
            return Classification {
                secure_handling: true,
                ..Classification::default()
            };
        }

        let sanitized = self.is_sanitized(text);
        Classification {
            secure_handling: false,
            sql_injection: self.is_sql_injection(text),
            code_injection: self.is_code_injection(text, context),
            sanitized,
            sensitive_content: self.sensitive.is_match(text),
            sensitive_filename,
            benign_marker: self.benign.is_match(text),
        }
    }

    pub fn is_secure_handling(&self, text: &str) -> bool {
        self.secret_call.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// SQL keyword, at least one unsafe construction, and no safe
    /// parameterization.
    pub fn is_sql_injection(&self, text: &str) -> bool {
        if !RE_SQL_KEYWORD.is_match(text) {
            return false;
        }
        let unsafe_hit = UNSAFE_SQL.iter().find(|(_, re)| re.is_match(text));
        match unsafe_hit {
            Some((name, _)) if !self.safe.is_match(text) => {
                tracing::trace!(pattern = name, "unsafe SQL construction");
                true
            }
            _ => false,
        }
    }

    pub fn is_code_injection(&self, text: &str, context: ContentContext) -> bool {
        if let Some((name, _)) = CODE_INJECTION.iter().find(|(_, re)| re.is_match(text)) {
            tracing::trace!(pattern = name, "code injection construct");
            return true;
        }

        context == ContentContext::Command
            && RE_INTERPOLATION.captures_iter(text).any(|cap| {
                let token = cap.get(1).map_or("", |m| m.as_str());
                !self.sanitized_markers.iter().any(|m| m == token)
            })
    }

    pub fn is_sanitized(&self, text: &str) -> bool {
        self.safe.is_match(text)
            || RE_ESCAPE_CALL.is_match(text)
            || self
                .sanitized_markers
                .iter()
                .any(|m| !m.is_empty() && text.contains(m.as_str()))
    }

    pub fn is_sensitive_filename(&self, basename: &str) -> bool {
        self.sensitive_filenames.is_match(basename)
    }
}
