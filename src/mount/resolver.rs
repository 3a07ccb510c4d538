//! # Mount Resolver
//!
//! Fetches every secret of a validated request from the provider and builds the
//! (object version, file) pairs returned to the driver.
//!
//! Fetches run with bounded concurrency but results keep the order of the request.
//! The first failure aborts the whole mount as soon as it happens: fetches still in
//! flight are dropped and no partial result is returned.

use super::error::MountError;
use super::request::SecretRef;
use crate::provider::SecretManagerProvider;
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Version metadata the driver uses for rotation detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    /// `SecretRef::id()` of the requested reference
    pub id: String,
    /// Version actually served; empty if the backend did not report one
    pub version: String,
}

/// File the driver writes into the volume
#[derive(Clone, PartialEq, Eq)]
pub struct SecretFile {
    pub path: String,
    pub mode: i32,
    pub contents: Vec<u8>,
}

impl std::fmt::Debug for SecretFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretFile")
            .field("path", &self.path)
            .field("mode", &format_args!("{:#o}", self.mode))
            .field("contents", &format_args!("<{} bytes>", self.contents.len()))
            .finish()
    }
}

/// Result of resolving one [`SecretRef`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    pub object_version: ObjectVersion,
    pub file: SecretFile,
}

/// Resolves secret references against a shared provider
#[derive(Debug, Clone)]
pub struct MountResolver {
    provider: Arc<dyn SecretManagerProvider>,
    max_concurrent_fetches: usize,
}

impl MountResolver {
    /// `max_concurrent_fetches` of 1 fetches strictly in order, one at a time
    pub fn new(provider: Arc<dyn SecretManagerProvider>, max_concurrent_fetches: usize) -> Self {
        Self {
            provider,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Resolve all `secrets`, in order, writing files with `mode`
    pub async fn resolve(
        &self,
        secrets: &[SecretRef],
        mode: i32,
    ) -> Result<Vec<ResolvedSecret>, MountError> {
        let pending: Vec<_> = secrets
            .iter()
            .enumerate()
            .map(|(index, secret)| async move {
                let resolved = self.resolve_one(secret, mode).await?;
                Ok::<_, MountError>((index, resolved))
            })
            .collect();
        let mut fetches =
            futures::stream::iter(pending).buffer_unordered(self.max_concurrent_fetches);

        // Fetches complete in any order; slots restore the request order. Returning
        // on the first error drops `fetches` and with it every request still in flight.
        let mut slots: Vec<Option<ResolvedSecret>> = vec![None; secrets.len()];
        while let Some((index, resolved)) = fetches.try_next().await? {
            slots[index] = Some(resolved);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    async fn resolve_one(
        &self,
        secret: &SecretRef,
        mode: i32,
    ) -> Result<ResolvedSecret, MountError> {
        let unveiled = self
            .provider
            .unveil(&secret.vault_id, &secret.name, secret.version)
            .await
            .map_err(|cause| {
                warn!(
                    secret.name = %secret.name,
                    secret.vault_id = %secret.vault_id,
                    error = %format!("{cause:#}"),
                    "Failed to unveil secret"
                );
                MountError::UpstreamFailure {
                    name: secret.name.clone(),
                    vault_id: secret.vault_id.clone(),
                    cause,
                }
            })?;

        let version = unveiled
            .version
            .map(|v| v.to_string())
            .unwrap_or_default();
        debug!(
            secret.name = %secret.name,
            secret.vault_id = %secret.vault_id,
            version = %version,
            "Unveiled secret"
        );

        Ok(ResolvedSecret {
            object_version: ObjectVersion {
                id: secret.id(),
                version,
            },
            file: SecretFile {
                path: secret.file_path().to_string(),
                mode,
                contents: unveiled.value,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::UnveiledSecret;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns `"{vault}/{name}"` as the value, fails for names starting with `fail`
    ///
    /// Names starting with `slow` take five seconds.
    #[derive(Debug, Default)]
    struct FakeProvider {
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    #[async_trait]
    impl SecretManagerProvider for FakeProvider {
        async fn unveil(
            &self,
            vault_id: &str,
            name: &str,
            version: Option<i64>,
        ) -> Result<UnveiledSecret> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Later entries finish first to exercise ordering
            let delay = match name {
                "secret1" => 30,
                "secret2" => 15,
                _ if name.starts_with("slow") => 5_000,
                _ => 1,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);

            if name.starts_with("fail") {
                return Err(anyhow!("secret not found"));
            }
            Ok(UnveiledSecret {
                value: format!("{vault_id}/{name}").into_bytes(),
                version: version.or(Some(7)),
            })
        }
    }

    fn resolver_for(provider: &Arc<FakeProvider>, max_concurrent_fetches: usize) -> MountResolver {
        let provider = Arc::clone(provider);
        MountResolver::new(provider, max_concurrent_fetches)
    }

    fn secret(vault_id: &str, name: &str) -> SecretRef {
        SecretRef {
            vault_id: vault_id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_builds_object_versions_and_files() {
        let resolver = MountResolver::new(Arc::new(FakeProvider::default()), 4);
        let secrets = vec![
            SecretRef {
                version: Some(1),
                path: "config/db.txt".to_string(),
                ..secret("1234", "secret1")
            },
            secret("5678", "secret2"),
        ];

        let resolved = resolver.resolve(&secrets, 0o640).await.unwrap();

        assert_eq!(
            resolved,
            vec![
                ResolvedSecret {
                    object_version: ObjectVersion {
                        id: "vaults/1234/secrets/secret1/versions/1".to_string(),
                        version: "1".to_string(),
                    },
                    file: SecretFile {
                        path: "config/db.txt".to_string(),
                        mode: 0o640,
                        contents: b"1234/secret1".to_vec(),
                    },
                },
                ResolvedSecret {
                    object_version: ObjectVersion {
                        id: "vaults/5678/secrets/secret2/versions/latest".to_string(),
                        version: "7".to_string(),
                    },
                    file: SecretFile {
                        path: "secret2".to_string(),
                        mode: 0o640,
                        contents: b"5678/secret2".to_vec(),
                    },
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_preserves_order_under_concurrency() {
        let resolver = MountResolver::new(Arc::new(FakeProvider::default()), 8);
        let secrets = vec![
            secret("v", "secret1"),
            secret("v", "secret2"),
            secret("v", "secret3"),
        ];

        let resolved = resolver.resolve(&secrets, 0o644).await.unwrap();
        let paths: Vec<_> = resolved.iter().map(|r| r.file.path.as_str()).collect();
        assert_eq!(paths, ["secret1", "secret2", "secret3"]);
    }

    #[tokio::test]
    async fn test_resolve_is_all_or_nothing() {
        for concurrency in [1, 4] {
            let resolver = MountResolver::new(Arc::new(FakeProvider::default()), concurrency);
            let secrets = vec![
                secret("v1", "secret1"),
                secret("v2", "fail-me"),
                secret("v3", "secret3"),
            ];

            let err = resolver.resolve(&secrets, 0o644).await.unwrap_err();
            match err {
                MountError::UpstreamFailure { name, vault_id, .. } => {
                    assert_eq!(name, "fail-me");
                    assert_eq!(vault_id, "v2");
                }
                other => panic!("expected upstream failure, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_sequential_stops_after_failure() {
        let provider = Arc::new(FakeProvider::default());
        let resolver = resolver_for(&provider, 1);
        let secrets = vec![secret("v", "fail-first"), secret("v", "secret2")];

        assert!(resolver.resolve(&secrets, 0o644).await.is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_fails_fast_and_drops_in_flight_fetches() {
        let provider = Arc::new(FakeProvider::default());
        let resolver = resolver_for(&provider, 4);
        let secrets = vec![
            secret("v", "slow-first"),
            secret("v", "fail-fast"),
            secret("v", "slow-last"),
        ];

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            resolver.resolve(&secrets, 0o644),
        )
        .await
        .expect("resolve must not wait for slower fetches after a failure");
        match result {
            Err(MountError::UpstreamFailure { name, .. }) => assert_eq!(name, "fail-fast"),
            other => panic!("expected upstream failure, got {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);

        // The slow fetches were dropped, so they never finish
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(provider.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_resolve_cancels_fetches() {
        let provider = Arc::new(FakeProvider::default());
        let resolver = resolver_for(&provider, 4);
        let secrets = vec![secret("v", "slow-a"), secret("v", "slow-b")];

        let elapsed = tokio::time::timeout(
            Duration::from_millis(100),
            resolver.resolve(&secrets, 0o644),
        )
        .await;
        assert!(elapsed.is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(provider.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_empty() {
        let resolver = MountResolver::new(Arc::new(FakeProvider::default()), 0);
        assert!(resolver.resolve(&[], 0o644).await.unwrap().is_empty());
    }

    #[test]
    fn test_secret_file_debug_hides_contents() {
        let file = SecretFile {
            path: "db".to_string(),
            mode: 0o644,
            contents: b"hunter2".to_vec(),
        };
        let rendered = format!("{file:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<7 bytes>"));
    }
}
