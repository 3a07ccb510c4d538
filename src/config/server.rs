//! # Server Configuration
//!
//! Tunables for the gRPC and HTTP servers, loaded from environment variables.

use super::env_var_or_default;

/// Server configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Number of secrets fetched concurrently within one Mount call (1 = sequential)
    pub max_concurrent_fetches: usize,
    /// Time allowed for in-flight RPCs to finish after a shutdown signal (seconds)
    pub graceful_shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            graceful_shutdown_timeout_secs: DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        use crate::constants::*;
        Self {
            max_concurrent_fetches: env_var_or_default(
                "MAX_CONCURRENT_FETCHES",
                DEFAULT_MAX_CONCURRENT_FETCHES,
            )
            .max(1),
            graceful_shutdown_timeout_secs: env_var_or_default(
                "GRACEFUL_SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECS,
            ),
        }
    }
}
