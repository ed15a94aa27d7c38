//! File mode evaluation.
//!
//! Parses a declared mode as octal and decides whether it escalates the
//! severity of a sensitive-content finding. An absent or unparsable mode is
//! [`PermissionVerdict::Unknown`], and the caller falls back to reporting on
//! content alone.

use crate::classifier::Classification;
use crate::resource::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionVerdict {
    /// No mode, or a mode that is not an octal number.
    Unknown,
    /// The mode is within the configured maximum.
    WithinLimit { actual: u32 },
    /// Sensitive content in a file more permissive than allowed.
    InsecurePermissions { actual: u32, max: u32 },
    /// Non-sensitive content, but a sensitive filename, with a permissive mode.
    InsecureFilename { actual: u32, max: u32 },
    /// Permissive mode on a file with nothing sensitive about it.
    NotSensitive { actual: u32 },
}

impl PermissionVerdict {
    /// `true` when the verdict replaces plain sensitivity reporting.
    pub fn escalates(&self) -> bool {
        matches!(
            self,
            PermissionVerdict::InsecurePermissions { .. } | PermissionVerdict::InsecureFilename { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator {
    max: u32,
}

impl PermissionEvaluator {
    pub fn new(max: u32) -> Self {
        PermissionEvaluator { max }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Evaluates a declared mode against the maximum.
    ///
    /// ```
    /// use oxidized_iac_smells::classifier::Classification;
    /// use oxidized_iac_smells::permissions::{PermissionEvaluator, PermissionVerdict};
    /// use oxidized_iac_smells::resource::Value;
    ///
    /// let evaluator = PermissionEvaluator::new(0o600);
    /// let sensitive = Classification { sensitive_content: true, ..Default::default() };
    /// let mode = Value::Literal("0644".into());
    ///
    /// assert_eq!(
    ///     evaluator.evaluate(Some(&mode), &sensitive),
    ///     PermissionVerdict::InsecurePermissions { actual: 0o644, max: 0o600 },
    /// );
    /// assert_eq!(evaluator.evaluate(None, &sensitive), PermissionVerdict::Unknown);
    /// ```
    pub fn evaluate(&self, mode: Option<&Value>, classification: &Classification) -> PermissionVerdict {
        let Some(actual) = mode.and_then(parse_mode) else {
            return PermissionVerdict::Unknown;
        };

        if actual <= self.max {
            PermissionVerdict::WithinLimit { actual }
        } else if classification.sensitive_content {
            PermissionVerdict::InsecurePermissions {
                actual,
                max: self.max,
            }
        } else if classification.sensitive_filename {
            PermissionVerdict::InsecureFilename {
                actual,
                max: self.max,
            }
        } else {
            PermissionVerdict::NotSensitive { actual }
        }
    }
}

/// Parses a mode attribute into permission bits.
///
/// Accepts string literals such as `"0644"`, `"644"`, or `"0o644"`, and bare
/// numeric expressions. A bare number with a leading zero (`0644`) is octal;
/// one without (`420`) is decimal, as the recipe language reads it. Returns
/// `None` for anything else.
pub fn parse_mode(value: &Value) -> Option<u32> {
    let text = value.text()?.trim();
    let (digits, radix) = match text.strip_prefix("0o") {
        Some(rest) => (rest, 8),
        None if value.is_raw() && !text.starts_with('0') => (text, 10),
        None => (text, 8),
    };

    let parsed = if !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)) {
        u32::from_str_radix(digits, radix)
            .ok()
            .filter(|m| *m <= 0o7777)
    } else {
        None
    };

    if parsed.is_none() {
        tracing::debug!(mode = text, "mode is not a numeric file mode; permission check skipped");
    }
    parsed
}

/// Renders a mode as zero-padded four-digit octal (`0644`).
pub fn format_mode(mode: u32) -> String {
    format!("{mode:04o}")
}
