//! # Metrics Registry
//!
//! Prometheus metrics registry setup and registration.

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Register all metrics with the Prometheus registry
///
/// Must be called once at start-up. Prometheus metrics internally use Arc,
/// so registering clones of the statics is cheap.
pub fn register_metrics() -> Result<()> {
    super::rpc_metrics::register_rpc_metrics()?;
    super::provider_metrics::register_provider_metrics()?;
    Ok(())
}

/// Render all registered metrics in the Prometheus text exposition format
pub fn encode_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not valid UTF-8")
}
