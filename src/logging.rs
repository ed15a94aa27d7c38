//! Diagnostic stream.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. The binary calls [`init_tracing`] at startup,
//! which writes to stderr so report output on stdout stays clean.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Installs a stderr fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// diagnostics (skipped declarations, malformed versions and modes) when
/// `verbose` is set. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "oxidized_iac_smells=debug"
    } else {
        "oxidized_iac_smells=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}
