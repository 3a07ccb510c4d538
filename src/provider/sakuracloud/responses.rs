//! # Response Types
//!
//! SakuraCloud Secret Manager REST API response bodies.

use serde::Deserialize;

/// Body returned by `POST /vaults/{vault_id}/secrets/unveil`
#[derive(Debug, Deserialize)]
pub struct UnveilResponse {
    #[serde(rename = "Secret")]
    pub secret: UnveiledValue,
}

#[derive(Deserialize)]
pub struct UnveiledValue {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "Version", default)]
    pub version: Option<i64>,
}

impl std::fmt::Debug for UnveiledValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnveiledValue")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unveil_response_null_version() {
        let response: UnveilResponse = serde_json::from_str(
            r#"{"Secret": {"Name": "db", "Value": "s3cr3t", "Version": null}}"#,
        )
        .unwrap();
        assert_eq!(response.secret.value, "s3cr3t");
        assert_eq!(response.secret.version, None);
    }
}
