//! Canonical resource model.
//!
//! A [`Resource`] is what the [extractor](crate::extract) makes of one
//! declaration block: its kind, its identifier (package name, file path,
//! command name), and the attributes that matter for smell detection.
//! Resources own their data; nothing here borrows from the parsed input.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Attribute key for a package version.
pub const VERSION: &str = "version";
/// Attribute key for inline file content.
pub const CONTENT: &str = "content";
/// Attribute key for a file mode.
pub const MODE: &str = "mode";
/// Attribute key for a remote download URL.
pub const SOURCE: &str = "source";
/// Attribute key for a remote download checksum.
pub const CHECKSUM: &str = "checksum";
/// Attribute key for an `execute` command line.
pub const COMMAND: &str = "command";
/// Attribute key for an inline script body (`bash`, `script`).
pub const CODE: &str = "code";
/// Attribute key for a scripted block body (`ruby_block`).
pub const BLOCK: &str = "block";

/// The kind of infrastructure resource a declaration describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Package,
    File,
    RemoteFile,
    Execute,
    ScriptedBlock,
}

impl ResourceKind {
    /// Maps a resource type name (`package`, `apt_package`, `remote_file`, …)
    /// to its kind. Returns `None` for types with no security-relevant shape.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "package" => Some(ResourceKind::Package),
            n if n.ends_with("_package") => Some(ResourceKind::Package),
            "file" | "template" | "cookbook_file" => Some(ResourceKind::File),
            "remote_file" => Some(ResourceKind::RemoteFile),
            "execute" | "bash" | "script" | "powershell_script" => Some(ResourceKind::Execute),
            "ruby_block" => Some(ResourceKind::ScriptedBlock),
            _ => None,
        }
    }

    /// Attribute keys that carry meaning for this kind. Any other statement
    /// in the declaration body is ignored by extraction.
    pub fn attribute_keys(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Package => &[VERSION],
            ResourceKind::File => &[CONTENT, MODE],
            ResourceKind::RemoteFile => &[SOURCE, MODE, CHECKSUM],
            ResourceKind::Execute => &[COMMAND, CODE],
            ResourceKind::ScriptedBlock => &[BLOCK],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Package => write!(f, "package"),
            ResourceKind::File => write!(f, "file"),
            ResourceKind::RemoteFile => write!(f, "remote_file"),
            ResourceKind::Execute => write!(f, "execute"),
            ResourceKind::ScriptedBlock => write!(f, "scripted_block"),
        }
    }
}

/// An attribute value as captured from the declaration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A string literal; holds the literal's value.
    Literal(String),
    /// A non-literal expression (interpolation, function call, bare number);
    /// holds its pretty-printed source.
    Raw(String),
    /// The attribute was called without a usable argument.
    Unset,
}

impl Value {
    /// Text to run heuristics against: the literal value or the raw source.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Literal(s) | Value::Raw(s) => Some(s),
            Value::Unset => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }
}

/// Where a declaration lives in its source. Ordering is file, then line,
/// then column, which gives report output a stable order.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Location {
    pub file: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// One extracted infrastructure declaration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub identifier: String,
    pub attributes: BTreeMap<String, Value>,
    pub location: Location,
}

impl Resource {
    pub fn new(kind: ResourceKind, identifier: impl Into<String>, location: Location) -> Self {
        Resource {
            kind,
            identifier: identifier.into(),
            attributes: BTreeMap::new(),
            location,
        }
    }

    /// Builder-style attribute setter, mostly useful in tests.
    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns the last path component of the identifier, used for
    /// sensitive-filename matching.
    pub fn basename(&self) -> &str {
        self.identifier
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.identifier)
    }
}
