//! Tracing subscriber setup for the binaries.
//!
//! The library only emits events; each binary calls [`init_tracing`] once.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Maps `-v` occurrences to a filter directive.
pub fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` takes precedence over the
/// verbosity count.
pub fn init_tracing(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))
}
