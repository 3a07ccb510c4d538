//! # Initialization
//!
//! Provider start-up: rustls crypto provider, tracing, metrics registration and
//! construction of the Secret Manager client and gRPC service.

use crate::config::{SecretManagerConfig, ServerConfig};
use crate::constants;
use crate::mount::MountResolver;
use crate::observability;
use crate::provider::{SakuraCloudSecretManager, SecretManagerProvider};
use crate::server::CsiProviderService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Initialization result containing all components needed to serve
#[derive(Debug)]
pub struct InitializationResult {
    /// gRPC service, ready to be registered on a server
    pub service: CsiProviderService,
    /// Server tunables
    pub server_config: ServerConfig,
}

/// Initialize the provider runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - Secret Manager client creation (shared by all Mount calls)
pub fn initialize() -> Result<InitializationResult> {
    observability::logging::init_tracing()?;

    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    info!(
        version = constants::PROVIDER_VERSION,
        "Starting {}",
        constants::PROVIDER_NAME
    );

    observability::metrics::register_metrics()?;

    let server_config = ServerConfig::from_env();
    let secret_manager_config =
        SecretManagerConfig::from_env().context("Failed to load Secret Manager configuration")?;
    info!(
        endpoint = %secret_manager_config.endpoint,
        request_timeout_secs = secret_manager_config.request_timeout_secs,
        max_concurrent_fetches = server_config.max_concurrent_fetches,
        "Loaded configuration"
    );

    let provider: Arc<dyn SecretManagerProvider> = Arc::new(
        SakuraCloudSecretManager::new(&secret_manager_config)
            .context("Failed to create Secret Manager client")?,
    );
    let resolver = MountResolver::new(provider, server_config.max_concurrent_fetches);
    let service = CsiProviderService::new(resolver, constants::PROVIDER_VERSION);

    Ok(InitializationResult {
        service,
        server_config,
    })
}
