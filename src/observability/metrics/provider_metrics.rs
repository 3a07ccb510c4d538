//! # Provider Metrics
//!
//! Metrics for Secret Manager API calls.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounter};
use std::sync::LazyLock;
use std::time::Duration;

static SECRETS_FETCHED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "csi_provider_secrets_fetched_total",
        "Total number of secrets fetched from Secret Manager",
    )
    .expect("Failed to create SECRETS_FETCHED_TOTAL metric - this should never happen")
});

static SECRET_FETCH_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "csi_provider_secret_fetch_errors_total",
        "Total number of failed Secret Manager fetches",
    )
    .expect("Failed to create SECRET_FETCH_ERRORS_TOTAL metric - this should never happen")
});

static SECRET_FETCH_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "csi_provider_secret_fetch_duration_seconds",
            "Duration of Secret Manager fetches in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .expect("Failed to create SECRET_FETCH_DURATION metric - this should never happen")
});

/// Register provider metrics with the registry
pub(crate) fn register_provider_metrics() -> Result<()> {
    REGISTRY.register(Box::new(SECRETS_FETCHED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCH_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCH_DURATION.clone()))?;
    Ok(())
}

/// Record one Secret Manager fetch
pub fn observe_secret_fetch(duration: Duration, success: bool) {
    SECRET_FETCH_DURATION.observe(duration.as_secs_f64());
    if success {
        SECRETS_FETCHED_TOTAL.inc();
    } else {
        SECRET_FETCH_ERRORS_TOTAL.inc();
    }
}
