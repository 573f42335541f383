//! Tracing setup for the opusctl CLI
//!
//! Usage:
//!   opusctl --debug serve             # Debug logging to console
//!   RUST_LOG=opusctl_server=debug ... # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
}

/// Default filter directive when RUST_LOG is absent.
fn default_directive(config: &TracingConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialize console tracing.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
