//! # Secret Manager Configuration
//!
//! Connection settings for the SakuraCloud Secret Manager API.

use super::env_var_or_default;
use crate::provider::sakuracloud::Credentials;
use anyhow::Result;

/// Secret Manager client configuration
#[derive(Debug, Clone)]
pub struct SecretManagerConfig {
    /// API base URL, without the `/vaults/...` suffix
    pub endpoint: String,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
    pub credentials: Credentials,
}

impl SecretManagerConfig {
    /// Load configuration from environment variables
    ///
    /// Credentials are required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        use crate::constants::*;
        Ok(Self {
            endpoint: std::env::var("SAKURACLOUD_SECRETMANAGER_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SECRETMANAGER_ENDPOINT.to_string()),
            request_timeout_secs: env_var_or_default(
                "SAKURACLOUD_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            credentials: Credentials::from_env()?,
        })
    }
}
