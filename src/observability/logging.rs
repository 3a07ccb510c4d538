//! # Logging
//!
//! `tracing` subscriber setup. The filter comes from `RUST_LOG` and defaults to
//! info-level logs for this crate.

use crate::constants::DEFAULT_LOG_FILTER;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Fails if a global subscriber was already installed.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
