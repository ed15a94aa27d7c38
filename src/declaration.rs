//! Parser interface.
//!
//! The smell engine never parses recipe source itself. A front-end parser
//! hands it declaration nodes through the small [`Declaration`] contract:
//! a resource type, an identifier, and the attribute-style calls inside the
//! declaration body.
//!
//! [`DeclarationNode`] is a ready-made implementation backed by `serde`, so a
//! parser written in any language can emit a JSON dump that this crate reads
//! with [`load_file`]:
//!
//! ```json
//! {
//!   "file": "recipes/default.rb",
//!   "declarations": [
//!     {
//!       "type": "file",
//!       "name": { "str": "/tmp/secrets.txt" },
//!       "line": 3,
//!       "body": [
//!         { "method": "content", "args": [{ "str": "password=hunter2" }] },
//!         { "method": "mode", "args": [{ "str": "0644" }] },
//!         { "method": "action", "args": [{ "raw": ":create" }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::AuditError;
use crate::resource::Location;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An argument expression as produced by the front-end parser.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expr {
    /// A plain string literal.
    Str(String),
    /// Anything else, carried as pretty-printed source.
    Raw(String),
    /// An explicit `nil`.
    Nil,
}

/// One call statement inside a declaration body, e.g. `mode '0644'`.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    pub method: &'a str,
    /// The first argument, if the call has one.
    pub argument: Option<&'a Expr>,
}

/// The extraction contract a parser must satisfy.
///
/// Implementers **must** be [`Sync`] to be analysed through
/// [`SmellEngine::analyze`](crate::engine::SmellEngine::analyze), which
/// extracts declarations in parallel.
pub trait Declaration {
    /// Name of the resource call (`package`, `file`, `execute`, …).
    fn resource_type(&self) -> &str;

    /// The identifier argument of the resource call.
    fn identifier(&self) -> Option<&Expr>;

    /// Statements of the enclosing body, or `None` when the call has no body.
    fn body(&self) -> Option<Vec<Statement<'_>>>;

    fn location(&self) -> Location;
}

/// A call statement in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallNode {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

/// A serialized declaration block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclarationNode {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: Option<Expr>,
    #[serde(default)]
    pub body: Option<Vec<CallNode>>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

impl DeclarationNode {
    /// Convenience constructor for a node with a string-literal identifier.
    pub fn new(resource_type: &str, name: &str) -> Self {
        DeclarationNode {
            resource_type: resource_type.to_string(),
            name: Some(Expr::Str(name.to_string())),
            body: Some(Vec::new()),
            file: None,
            line: 0,
            column: 0,
        }
    }

    /// Appends a call statement with a single argument to the body.
    pub fn call(mut self, method: &str, arg: Expr) -> Self {
        self.body.get_or_insert_with(Vec::new).push(CallNode {
            method: method.to_string(),
            args: vec![arg],
        });
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl Declaration for DeclarationNode {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn identifier(&self) -> Option<&Expr> {
        self.name.as_ref()
    }

    fn body(&self) -> Option<Vec<Statement<'_>>> {
        self.body.as_ref().map(|calls| {
            calls
                .iter()
                .map(|c| Statement {
                    method: &c.method,
                    argument: c.args.first(),
                })
                .collect()
        })
    }

    fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

/// Top-level shape of a dump file: either an envelope naming the source file
/// or a bare array of nodes.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DumpDocument {
    Envelope {
        file: Option<PathBuf>,
        declarations: Vec<DeclarationNode>,
    },
    Bare(Vec<DeclarationNode>),
}

/// Parses a dump from a JSON string.
///
/// Nodes without their own `file` inherit the envelope's `file`, falling back
/// to `default_file`.
pub fn parse_dump(
    json: &str,
    default_file: Option<&Path>,
) -> Result<Vec<DeclarationNode>, serde_json::Error> {
    let (file, mut nodes) = match serde_json::from_str::<DumpDocument>(json)? {
        DumpDocument::Envelope { file, declarations } => (file, declarations),
        DumpDocument::Bare(nodes) => (None, nodes),
    };

    let file = file.or_else(|| default_file.map(Path::to_path_buf));
    for node in &mut nodes {
        if node.file.is_none() {
            node.file = file.clone();
        }
    }
    Ok(nodes)
}

/// Reads and parses a declaration dump from disk.
///
/// # Errors
///
/// Returns [`AuditError::Read`] when the file cannot be read and
/// [`AuditError::Parse`] when it is not a valid dump.
pub fn load_file(path: &Path) -> Result<Vec<DeclarationNode>, AuditError> {
    let content = std::fs::read_to_string(path).map_err(|source| AuditError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let nodes = parse_dump(&content, Some(path)).map_err(|source| AuditError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = nodes.len(), "loaded declarations");
    Ok(nodes)
}

/// Resolves the dumps to audit: `path` itself when it is a file, otherwise
/// every `*.json` file beneath it, sorted.
pub fn collect_dumps(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    files
}
