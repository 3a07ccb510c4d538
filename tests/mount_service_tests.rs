//! # CSIDriverProvider Service Tests
//!
//! Exercises the gRPC service end to end (attributes in, files out) against an
//! in-memory secret manager.
//!
//! These tests verify:
//! - Version payload
//! - Default vault propagation and path overrides in Mount responses
//! - Status codes for invalid requests and upstream failures
//! - All-or-nothing responses

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use secrets_store_csi_driver_provider_sakuracloud::mount::MountResolver;
use secrets_store_csi_driver_provider_sakuracloud::provider::{
    SecretManagerProvider, UnveiledSecret,
};
use secrets_store_csi_driver_provider_sakuracloud::server::grpc::v1alpha1::{
    self, csi_driver_provider_server::CsiDriverProvider,
};
use secrets_store_csi_driver_provider_sakuracloud::server::CsiProviderService;
use std::collections::HashMap;
use std::sync::Arc;
use tonic::{Code, Request};

/// Secret manager backed by a map of `(vault, name)` to `(value, version)`
#[derive(Debug, Default)]
struct InMemorySecretManager {
    secrets: HashMap<(String, String), (String, Option<i64>)>,
}

impl InMemorySecretManager {
    fn with(mut self, vault_id: &str, name: &str, value: &str, version: Option<i64>) -> Self {
        self.secrets.insert(
            (vault_id.to_string(), name.to_string()),
            (value.to_string(), version),
        );
        self
    }
}

#[async_trait]
impl SecretManagerProvider for InMemorySecretManager {
    async fn unveil(
        &self,
        vault_id: &str,
        name: &str,
        version: Option<i64>,
    ) -> Result<UnveiledSecret> {
        let (value, latest) = self
            .secrets
            .get(&(vault_id.to_string(), name.to_string()))
            .ok_or_else(|| anyhow!("404 Not Found"))?;
        Ok(UnveiledSecret {
            value: value.clone().into_bytes(),
            version: version.or(*latest),
        })
    }
}

fn service(provider: InMemorySecretManager) -> CsiProviderService {
    CsiProviderService::new(MountResolver::new(Arc::new(provider), 4), "1.2.3")
}

fn default_provider() -> InMemorySecretManager {
    InMemorySecretManager::default()
        .with("1234", "secret1", "value1", Some(3))
        .with("5678", "secret2", "value2", None)
        .with("1234", "secret3", "value3", Some(1))
}

fn mount_request(attributes: &str, permission: &str) -> Request<v1alpha1::MountRequest> {
    Request::new(v1alpha1::MountRequest {
        attributes: attributes.to_string(),
        secrets: "{}".to_string(),
        target_path: "/var/lib/kubelet/pods/uid/volumes/secrets".to_string(),
        permission: permission.to_string(),
        current_object_version: Vec::new(),
    })
}

#[tokio::test]
async fn test_version() {
    let response = service(default_provider())
        .version(Request::new(v1alpha1::VersionRequest {
            version: "v1alpha1".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.version, "v1alpha1");
    assert_eq!(
        response.runtime_name,
        "secrets-store-csi-driver-provider-sakuracloud"
    );
    assert_eq!(response.runtime_version, "1.2.3");
}

#[tokio::test]
async fn test_mount_returns_files_in_request_order() {
    let attributes = r#"{
        "csi.storage.k8s.io/pod.name": "test-pod",
        "csi.storage.k8s.io/pod.namespace": "default",
        "vaultID": "1234",
        "secrets": "- name: secret1\n- vaultID: \"5678\"\n  name: secret2\n  path: subdir/secret2.txt\n- name: secret3\n  version: 1"
    }"#;

    let response = service(default_provider())
        .mount(mount_request(attributes, "420"))
        .await
        .unwrap()
        .into_inner();

    let object_versions: Vec<_> = response
        .object_version
        .iter()
        .map(|ov| (ov.id.as_str(), ov.version.as_str()))
        .collect();
    assert_eq!(
        object_versions,
        [
            ("vaults/1234/secrets/secret1/versions/latest", "3"),
            ("vaults/5678/secrets/secret2/versions/latest", ""),
            ("vaults/1234/secrets/secret3/versions/1", "1"),
        ]
    );

    let files: Vec<_> = response
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.mode, f.contents.as_slice()))
        .collect();
    assert_eq!(
        files,
        [
            ("secret1", 0o644, b"value1".as_slice()),
            ("subdir/secret2.txt", 0o644, b"value2".as_slice()),
            ("secret3", 0o644, b"value3".as_slice()),
        ]
    );
    assert!(response.error.is_none());
}

#[tokio::test]
async fn test_mount_empty_permission_uses_default_mode() {
    let attributes = r#"{"vaultID": "1234", "secrets": "- name: secret1"}"#;

    let response = service(default_provider())
        .mount(mount_request(attributes, ""))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.files[0].mode, 0o644);
}

#[tokio::test]
async fn test_mount_explicit_permission_is_honoured() {
    let attributes = r#"{"vaultID": "1234", "secrets": "- name: secret1"}"#;

    let response = service(default_provider())
        .mount(mount_request(attributes, "256"))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.files[0].mode, 0o400);
}

#[tokio::test]
async fn test_mount_requires_target_path() {
    let mut request = mount_request(r#"{"vaultID": "1234"}"#, "420");
    request.get_mut().target_path = String::new();

    let status = service(default_provider())
        .mount(request)
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "targetPath is required");
}

#[tokio::test]
async fn test_mount_rejects_invalid_permission() {
    let status = service(default_provider())
        .mount(mount_request(r#"{"vaultID": "1234"}"#, "rw-r--r--"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().contains("unable to parse permission"));
}

#[tokio::test]
async fn test_mount_rejects_malformed_attributes() {
    let status = service(default_provider())
        .mount(mount_request("{not json", "420"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().starts_with("failed to parse mount config"));
}

#[tokio::test]
async fn test_mount_reports_every_validation_error() {
    let attributes = r#"{
        "secrets": "- path: ../escape\n- name: secret2\n  vaultID: \"5678\"\n  path: config/../escape\n- name: secret3\n  vaultID: \"5678\"\n  path: /absolute/path"
    }"#;

    let status = service(default_provider())
        .mount(mount_request(attributes, "420"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    let message = status.message();
    for expected in [
        "secrets[0].name is required",
        "secrets[0].vaultID is required",
        "secrets[0].path is invalid: path must not contain relative path escape sequences like '../'",
        "secrets[1].path is invalid: path must not contain relative path escape sequences like '../'",
        "secrets[2].path is invalid: path must not be absolute",
    ] {
        assert!(message.contains(expected), "missing {expected:?} in {message:?}");
    }
}

#[tokio::test]
async fn test_mount_upstream_failure_returns_nothing() {
    let attributes = r#"{
        "vaultID": "1234",
        "secrets": "- name: secret1\n- name: missing\n- name: secret3"
    }"#;

    let status = service(default_provider())
        .mount(mount_request(attributes, "420"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
    assert_eq!(
        status.message(),
        "failed to unveil secret \"missing\" in vault \"1234\": 404 Not Found"
    );
}

#[tokio::test]
async fn test_mount_without_secrets_returns_empty_response() {
    let response = service(default_provider())
        .mount(mount_request(r#"{"vaultID": "1234", "secrets": ""}"#, "420"))
        .await
        .unwrap()
        .into_inner();

    assert!(response.files.is_empty());
    assert!(response.object_version.is_empty());
}
