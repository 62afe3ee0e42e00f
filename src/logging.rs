//! Diagnostic logging on stderr, filtered by `RUST_LOG`.
//!
//! stdout carries the interactive form and reports, so log lines go to stderr.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. `default_directive` applies when `RUST_LOG`
/// is unset or invalid.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
