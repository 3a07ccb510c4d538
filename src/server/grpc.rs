//! # gRPC Service
//!
//! Implementation of the `v1alpha1.CSIDriverProvider` service called by the Secrets
//! Store CSI driver.
//!
//! - `Version` - reports the provider name and build version
//! - `Mount` - parses the mount attributes, fetches the secrets and returns their
//!   contents; the driver writes the files itself

use crate::constants::{PROVIDER_API_VERSION, PROVIDER_NAME};
use crate::mount::{self, MountError, MountResolver, ResolvedSecret};
use crate::observability;
use std::time::Instant;
use tonic::{Request, Response, Status};
use tracing::{info, info_span, warn, Instrument};

// Generated protobuf code
pub mod v1alpha1 {
    tonic::include_proto!("v1alpha1");
}

use v1alpha1::csi_driver_provider_server::{CsiDriverProvider, CsiDriverProviderServer};

const VERSION_METHOD: &str = "/v1alpha1.CSIDriverProvider/Version";
const MOUNT_METHOD: &str = "/v1alpha1.CSIDriverProvider/Mount";

/// Implementation of the CSIDriverProvider gRPC service
#[derive(Debug, Clone)]
pub struct CsiProviderService {
    resolver: MountResolver,
    runtime_version: String,
}

impl CsiProviderService {
    pub fn new(resolver: MountResolver, runtime_version: impl Into<String>) -> Self {
        Self {
            resolver,
            runtime_version: runtime_version.into(),
        }
    }

    /// Create a gRPC server instance
    pub fn into_server(self) -> CsiDriverProviderServer<Self> {
        CsiDriverProviderServer::new(self)
    }

    async fn mount_secrets(
        &self,
        request: v1alpha1::MountRequest,
    ) -> Result<v1alpha1::MountResponse, MountError> {
        if request.target_path.trim().is_empty() {
            return Err(MountError::MissingTargetPath);
        }

        let mode = mount::parse_permission(&request.permission)?;
        let mount_request = mount::parse_mount_request(&request.attributes)?;

        let span = tracing::Span::current();
        span.record("pod.name", mount_request.pod_name.as_str());
        span.record("pod.namespace", mount_request.pod_namespace.as_str());
        span.record("secrets", mount_request.secrets.len());

        let resolved = self.resolver.resolve(&mount_request.secrets, mode).await?;
        info!(count = resolved.len(), "Secrets resolved");

        Ok(into_mount_response(resolved))
    }
}

fn into_mount_response(resolved: Vec<ResolvedSecret>) -> v1alpha1::MountResponse {
    let mut object_version = Vec::with_capacity(resolved.len());
    let mut files = Vec::with_capacity(resolved.len());
    for secret in resolved {
        object_version.push(v1alpha1::ObjectVersion {
            id: secret.object_version.id,
            version: secret.object_version.version,
        });
        files.push(v1alpha1::File {
            path: secret.file.path,
            mode: secret.file.mode,
            contents: secret.file.contents,
        });
    }

    v1alpha1::MountResponse {
        object_version,
        error: None,
        files,
    }
}

/// Log and count a finished RPC
fn record_rpc<T>(method: &str, start: Instant, result: &Result<T, Status>) {
    let duration = start.elapsed();
    let (code, message) = match result {
        Ok(_) => (tonic::Code::Ok, ""),
        Err(status) => (status.code(), status.message()),
    };
    info!(
        method,
        duration = ?duration,
        status.code = ?code,
        status.message = message,
        "gRPC request processed"
    );
    observability::metrics::increment_grpc_requests(method, code);
}

#[tonic::async_trait]
impl CsiDriverProvider for CsiProviderService {
    async fn version(
        &self,
        request: Request<v1alpha1::VersionRequest>,
    ) -> Result<Response<v1alpha1::VersionResponse>, Status> {
        let start = Instant::now();
        info!(
            method = VERSION_METHOD,
            driver.version = %request.get_ref().version,
            "gRPC request received"
        );

        let result = Ok(Response::new(v1alpha1::VersionResponse {
            version: PROVIDER_API_VERSION.to_string(),
            runtime_name: PROVIDER_NAME.to_string(),
            runtime_version: self.runtime_version.clone(),
        }));
        record_rpc(VERSION_METHOD, start, &result);
        result
    }

    async fn mount(
        &self,
        request: Request<v1alpha1::MountRequest>,
    ) -> Result<Response<v1alpha1::MountResponse>, Status> {
        let start = Instant::now();
        let span = info_span!(
            "mount",
            pod.name = tracing::field::Empty,
            pod.namespace = tracing::field::Empty,
            secrets = tracing::field::Empty,
        );

        async move {
            info!(method = MOUNT_METHOD, "gRPC request received");

            let outcome = self.mount_secrets(request.into_inner()).await;
            observability::metrics::observe_mount_duration(start.elapsed());

            let result = outcome.map(Response::new).map_err(|err| {
                warn!(reason = err.as_str(), error = %err, "Mount failed");
                observability::metrics::increment_mount_errors(err.as_str());
                Status::from(err)
            });
            record_rpc(MOUNT_METHOD, start, &result);
            result
        }
        .instrument(span)
        .await
    }
}
