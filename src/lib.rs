//! # oxidized-iac-smells
//!
//! Security smell detection for infrastructure-as-code declarations.
//!
//! `oxidized-iac-smells` inspects already-parsed resource declarations
//! (packages, files, remote downloads, commands, scripted blocks) and
//! classifies each against a fixed set of security smells: outdated package
//! versions, exposed sensitive information, injection-prone content,
//! insecure download sources, and overly permissive file modes. Every
//! finding carries a verdict (True Positive, False Positive, True Negative).
//!
//! ## Quick start
//!
//! ```rust
//! use oxidized_iac_smells::config::Config;
//! use oxidized_iac_smells::declaration::{DeclarationNode, Expr};
//! use oxidized_iac_smells::engine::SmellEngine;
//! use oxidized_iac_smells::offense::{Smell, Verdict};
//!
//! let engine = SmellEngine::new(&Config::default()).unwrap();
//! let nodes = vec![DeclarationNode::new("file", "/tmp/secrets.txt")
//!     .call("content", Expr::Str("password=mysecretpassword".into()))
//!     .call("mode", Expr::Str("0644".into()))];
//!
//! let analysis = engine.analyze(&nodes);
//! let perms = analysis
//!     .offenses
//!     .iter()
//!     .find(|o| o.smell == Smell::InsecurePermissions)
//!     .unwrap();
//! assert_eq!(perms.verdict, Verdict::TruePositive);
//! ```
//!
//! ## Architecture
//!
//! 1. **[`declaration`]**: parser interface ([`declaration::Declaration`])
//!    and the JSON dump format external parsers emit.
//! 2. **[`extract`]**: turn declarations into [`resource::Resource`]s.
//! 3. **[`oracle`]**, **[`classifier`]**, **[`permissions`]**, **[`source`]**:
//!    the heuristics.
//! 4. **[`smells`]**: pluggable [`smells::Detector`]s, one per smell.
//! 5. **[`engine`]**: run detectors over resources in parallel.
//! 6. **[`audit`]** / **[`output`]**: load dumps, build an
//!    [`offense::AuditReport`], and format it.
//!
//! Detection is heuristic. It matches patterns; it does not track data flow.

pub mod audit;
pub mod classifier;
pub mod config;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod extract;
pub mod logging;
pub mod offense;
pub mod oracle;
pub mod output;
pub mod permissions;
pub mod resource;
pub mod smells;
pub mod source;
