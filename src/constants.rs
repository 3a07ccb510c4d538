//! # Constants
//!
//! Default values and fixed identifiers used across the provider.

/// Name reported to the CSI driver in `VersionResponse.runtime_name`
pub const PROVIDER_NAME: &str = "secrets-store-csi-driver-provider-sakuracloud";

/// Provider protocol version implemented by this crate
pub const PROVIDER_API_VERSION: &str = "v1alpha1";

/// Version reported in `VersionResponse.runtime_version`
pub const PROVIDER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default gRPC endpoint the driver connects to
pub const DEFAULT_ENDPOINT: &str = "unix:///tmp/sakuracloud.sock";

/// Default address of the health and metrics HTTP server
pub const DEFAULT_HEALTHZ_ADDR: &str = "0.0.0.0:8080";

/// File mode applied when the driver sends an empty permission string (rw-r--r--)
pub const DEFAULT_FILE_PERMISSION: u32 = 0o644;

/// Default SakuraCloud Secret Manager API base URL
pub const DEFAULT_SECRETMANAGER_ENDPOINT: &str =
    "https://secure.sakura.ad.jp/cloud/zone/is1a/api/cloud/1.1/secretmanager";

/// Default per-request timeout for Secret Manager API calls (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of secrets fetched concurrently within one Mount call
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Default time allowed for in-flight RPCs to drain on shutdown (seconds)
pub const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "secrets_store_csi_driver_provider_sakuracloud=info";
