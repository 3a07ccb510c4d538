//! # SakuraCloud Secret Manager Client
//!
//! Native REST implementation using reqwest with rustls.
//!
//! Only the read path is implemented:
//! - `POST {endpoint}/vaults/{vault_id}/secrets/unveil` - return a secret value
//!
//! Retries are not performed here. A failed Mount is retried as a whole by the CSI driver.

mod auth;
mod requests;
mod responses;

pub use auth::Credentials;

use crate::config::SecretManagerConfig;
use crate::observability;
use crate::provider::{SecretManagerProvider, UnveiledSecret};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use tracing::debug;

use self::requests::UnveilRequest;
use self::responses::UnveilResponse;

/// Longest error body kept in error messages
const MAX_ERROR_BODY_LEN: usize = 512;

/// SakuraCloud Secret Manager provider implementation
pub struct SakuraCloudSecretManager {
    http_client: Client,
    endpoint: Url,
    credentials: Credentials,
}

impl std::fmt::Debug for SakuraCloudSecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SakuraCloudSecretManager")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl SakuraCloudSecretManager {
    /// Create a new client from configuration
    pub fn new(config: &SecretManagerConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid Secret Manager endpoint '{}'", config.endpoint))?;
        if endpoint.cannot_be_a_base() {
            return Err(anyhow!(
                "Secret Manager endpoint '{}' cannot be used as a base URL",
                config.endpoint
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            endpoint,
            credentials: config.credentials.clone(),
        })
    }

    /// `{endpoint}/vaults/{vault_id}/secrets/unveil`, with the vault id percent-encoded
    fn unveil_url(&self, vault_id: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("Secret Manager endpoint cannot be used as a base URL"))?
            .pop_if_empty()
            .extend(["vaults", vault_id, "secrets", "unveil"]);
        Ok(url)
    }
}

#[async_trait]
impl SecretManagerProvider for SakuraCloudSecretManager {
    async fn unveil(
        &self,
        vault_id: &str,
        name: &str,
        version: Option<i64>,
    ) -> Result<UnveiledSecret> {
        let url = self.unveil_url(vault_id)?;
        debug!(vault_id, name, ?version, "Unveiling secret");

        let start = Instant::now();
        let result = self.send_unveil(url, name, version).await;
        observability::metrics::observe_secret_fetch(start.elapsed(), result.is_ok());
        result
    }
}

impl SakuraCloudSecretManager {
    async fn send_unveil(
        &self,
        url: Url,
        name: &str,
        version: Option<i64>,
    ) -> Result<UnveiledSecret> {
        let response = self
            .credentials
            .apply(self.http_client.post(url))
            .json(&UnveilRequest::new(name, version))
            .send()
            .await
            .context("Secret Manager request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .context("Failed to read error response body")
                .with_context(|| format!("Secret Manager returned {status}"))?;
            return Err(anyhow!(
                "Secret Manager returned {}: {}",
                status,
                truncate(body.trim(), MAX_ERROR_BODY_LEN)
            ));
        }

        let body: UnveilResponse = response
            .json()
            .await
            .context("Failed to decode Secret Manager response")?;

        Ok(UnveiledSecret {
            value: body.secret.value.into_bytes(),
            version: body.secret.version,
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
