//! # RPC Metrics
//!
//! Metrics for the gRPC surface: request counts by method and status code, and
//! Mount latency.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounterVec};
use std::sync::LazyLock;
use std::time::Duration;

static GRPC_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "csi_provider_grpc_requests_total",
            "Total number of gRPC requests handled, by method and status code",
        ),
        &["method", "code"],
    )
    .expect("Failed to create GRPC_REQUESTS_TOTAL metric - this should never happen")
});

static MOUNT_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "csi_provider_mount_duration_seconds",
            "Duration of Mount requests in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .expect("Failed to create MOUNT_DURATION metric - this should never happen")
});

static MOUNT_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "csi_provider_mount_errors_total",
            "Total number of failed Mount requests, by reason",
        ),
        &["reason"],
    )
    .expect("Failed to create MOUNT_ERRORS_TOTAL metric - this should never happen")
});

/// Register RPC metrics with the registry
pub(crate) fn register_rpc_metrics() -> Result<()> {
    REGISTRY.register(Box::new(GRPC_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(MOUNT_DURATION.clone()))?;
    REGISTRY.register(Box::new(MOUNT_ERRORS_TOTAL.clone()))?;
    Ok(())
}

pub fn increment_grpc_requests(method: &str, code: tonic::Code) {
    let code = format!("{code:?}");
    GRPC_REQUESTS_TOTAL
        .with_label_values(&[method, code.as_str()])
        .inc();
}

pub fn observe_mount_duration(duration: Duration) {
    MOUNT_DURATION.observe(duration.as_secs_f64());
}

pub fn increment_mount_errors(reason: &str) {
    MOUNT_ERRORS_TOTAL.with_label_values(&[reason]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_grpc_requests() {
        let counter = GRPC_REQUESTS_TOTAL
            .with_label_values(&["/v1alpha1.CSIDriverProvider/Mount", "Internal"]);
        let before = counter.get();
        increment_grpc_requests("/v1alpha1.CSIDriverProvider/Mount", tonic::Code::Internal);
        assert_eq!(counter.get(), before + 1u64);
    }

    #[test]
    fn test_increment_mount_errors() {
        let counter = MOUNT_ERRORS_TOTAL.with_label_values(&["validation_failed"]);
        let before = counter.get();
        increment_mount_errors("validation_failed");
        assert_eq!(counter.get(), before + 1u64);
    }

    #[test]
    fn test_observe_mount_duration() {
        let before = MOUNT_DURATION.get_sample_count();
        observe_mount_duration(Duration::from_millis(120));
        assert_eq!(MOUNT_DURATION.get_sample_count(), before + 1);
    }
}
