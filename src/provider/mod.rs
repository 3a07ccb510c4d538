//! # Secret Manager Providers
//!
//! Outbound abstraction over the secret backend. The mount resolver only needs one
//! operation: unveil the value of a secret, optionally at a given version.
//!
//! - `sakuracloud` - SakuraCloud Secret Manager REST implementation

pub mod sakuracloud;

use anyhow::Result;
use async_trait::async_trait;

pub use sakuracloud::SakuraCloudSecretManager;

/// Secret value returned by a provider
#[derive(Clone, PartialEq, Eq)]
pub struct UnveiledSecret {
    /// Raw secret bytes
    pub value: Vec<u8>,
    /// Version that was actually served; `None` if the backend does not track it
    pub version: Option<i64>,
}

impl std::fmt::Debug for UnveiledSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnveiledSecret")
            .field("value", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

/// Read access to a secret manager
///
/// Implementations are constructed once at start-up and shared across concurrent
/// Mount calls, so they must be safe for concurrent use.
#[async_trait]
pub trait SecretManagerProvider: Send + Sync + std::fmt::Debug {
    /// Fetch the value of `name` in `vault_id`; `version: None` selects the latest
    async fn unveil(
        &self,
        vault_id: &str,
        name: &str,
        version: Option<i64>,
    ) -> Result<UnveiledSecret>;
}
