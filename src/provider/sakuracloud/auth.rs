//! # SakuraCloud Authentication
//!
//! API key credentials, sent as HTTP basic auth on every request.

use anyhow::{Context, Result};

/// Environment variable holding the API access token
pub const ACCESS_TOKEN_ENV: &str = "SAKURACLOUD_ACCESS_TOKEN";
/// Environment variable holding the API access token secret
pub const ACCESS_TOKEN_SECRET_ENV: &str = "SAKURACLOUD_ACCESS_TOKEN_SECRET";

/// SakuraCloud API key pair
#[derive(Clone)]
pub struct Credentials {
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Load the key pair from `SAKURACLOUD_ACCESS_TOKEN` / `SAKURACLOUD_ACCESS_TOKEN_SECRET`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            access_token: required_env(ACCESS_TOKEN_ENV)?,
            access_token_secret: required_env(ACCESS_TOKEN_SECRET_ENV)?,
        })
    }

    /// Attach the credentials to a request
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.access_token, Some(&self.access_token_secret))
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{key} must be set"))
}
