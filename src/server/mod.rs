//! # Servers
//!
//! - `grpc` - the CSIDriverProvider gRPC service
//! - `endpoint` - parsing of the gRPC listen endpoint
//! - `http` - health probes and metrics

pub mod endpoint;
pub mod grpc;
pub mod http;

pub use endpoint::{Endpoint, InvalidEndpoint};
pub use grpc::CsiProviderService;
pub use http::{start_server, ServerState};
