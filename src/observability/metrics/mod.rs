//! # Metrics Module
//!
//! Prometheus metrics for monitoring the provider, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text encoding
//! - `rpc_metrics` - gRPC request metrics (Version/Mount calls, Mount duration)
//! - `provider_metrics` - Secret Manager fetch metrics

pub mod provider_metrics;
pub mod registry;
pub mod rpc_metrics;

pub use provider_metrics::*;
pub use registry::*;
pub use rpc_metrics::*;
