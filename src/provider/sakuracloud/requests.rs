//! # Request Types
//!
//! SakuraCloud Secret Manager REST API request bodies.

use serde::Serialize;

/// Body of `POST /vaults/{vault_id}/secrets/unveil`
#[derive(Debug, Serialize)]
pub struct UnveilRequest<'a> {
    #[serde(rename = "Secret")]
    pub secret: UnveilSecret<'a>,
}

/// Secret selector inside an [`UnveilRequest`]
#[derive(Debug, Serialize)]
pub struct UnveilSecret<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    /// Omitted to select the latest version
    #[serde(rename = "Version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl<'a> UnveilRequest<'a> {
    pub fn new(name: &'a str, version: Option<i64>) -> Self {
        Self {
            secret: UnveilSecret { name, version },
        }
    }
}
