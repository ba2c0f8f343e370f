// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// Logs go to stderr so stdout only ever carries report lines. The level is
// taken from RUST_LOG (e.g. RUST_LOG=extlinks=debug) and defaults to "warn".
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
