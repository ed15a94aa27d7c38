use clap::{Parser, Subcommand};
use oxidized_iac_smells::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oxidized-iac-smells",
    version,
    about = "Security smell detection for infrastructure-as-code declarations"
)]
pub struct Cli {
    /// Print debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a declaration dump, or a directory of dumps
    Audit {
        /// Path to a JSON declaration dump or a directory containing dumps
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Treat false positives as failures
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Most permissive file mode allowed, in octal (e.g. 0600)
        #[arg(long)]
        max_permissions: Option<String>,
    },

    /// List all built-in rules with descriptions
    ListRules,

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "exposure/insecure-permissions")
        rule_id: String,
    },
}
