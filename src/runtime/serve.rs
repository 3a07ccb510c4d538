//! # Serving
//!
//! Binds the gRPC endpoint, runs the gRPC and healthz servers side by side and
//! drives graceful shutdown.

use super::initialization::initialize;
use super::shutdown::watch_shutdown_signal;
use crate::config::Cli;
use crate::server::{start_server, CsiProviderService, Endpoint, ServerState};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{error, info, warn};

type GrpcServerHandle = JoinHandle<std::result::Result<(), tonic::transport::Error>>;

/// Run the provider until a shutdown signal is received
pub async fn run(cli: Cli) -> Result<()> {
    let endpoint = Endpoint::parse(&cli.endpoint)?;
    let init = initialize()?;
    let grace = Duration::from_secs(init.server_config.graceful_shutdown_timeout_secs);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_shutdown_signal(shutdown.clone()));

    let state = Arc::new(ServerState::default());
    let healthz = {
        let state = Arc::clone(&state);
        let shutdown = shutdown.clone();
        let addr = cli.healthz_addr;
        tokio::spawn(async move {
            if let Err(e) = start_server(addr, state, shutdown).await {
                error!(error = %format!("{e:#}"), "Healthz server error");
            }
        })
    };

    let result = serve_grpc(&endpoint, init.service, &state, shutdown.clone(), grace).await;

    // Stop the healthz server as well, whatever ended the gRPC server
    shutdown.cancel();
    if let Err(e) = healthz.await {
        warn!(error = %e, "Healthz server task failed");
    }

    result
}

/// Serve `service` on `endpoint` until `shutdown` is cancelled
///
/// In-flight RPCs get `grace` to finish; after that the server is aborted.
pub async fn serve_grpc(
    endpoint: &Endpoint,
    service: CsiProviderService,
    state: &ServerState,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let mut server = spawn_grpc_server(endpoint, service, shutdown.clone()).await?;
    state.set_ready(true);
    info!(%endpoint, "gRPC server is serving");

    tokio::select! {
        joined = &mut server => {
            state.set_ready(false);
            return flatten(joined);
        }
        () = shutdown.cancelled() => {}
    }

    state.set_ready(false);
    info!(%endpoint, timeout = ?grace, "Stopping gRPC server");
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => {
            flatten(joined)?;
            info!(%endpoint, "gRPC server stopped gracefully");
        }
        Err(_elapsed) => {
            warn!(%endpoint, "gRPC server did not stop gracefully");
            server.abort();
        }
    }
    cleanup_endpoint(endpoint);
    Ok(())
}

async fn spawn_grpc_server(
    endpoint: &Endpoint,
    service: CsiProviderService,
    shutdown: CancellationToken,
) -> Result<GrpcServerHandle> {
    let router = Server::builder().add_service(service.into_server());
    let signal = shutdown.cancelled_owned();

    match endpoint {
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            match std::fs::remove_file(path) {
                Ok(()) => info!(path = %path.display(), "Removed stale socket file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove existing socket file {}", path.display())
                    })
                }
            }
            let listener = tokio::net::UnixListener::bind(path)
                .with_context(|| format!("Failed to listen on {endpoint}"))?;
            let incoming = tokio_stream::wrappers::UnixListenerStream::new(listener);
            Ok(tokio::spawn(
                router.serve_with_incoming_shutdown(incoming, signal),
            ))
        }
        #[cfg(not(unix))]
        Endpoint::Unix(_) => Err(anyhow::anyhow!(
            "unix socket endpoints are not supported on this platform"
        )),
        Endpoint::Tcp(addr) => {
            let listener = tokio::net::TcpListener::bind(addr.as_str())
                .await
                .with_context(|| format!("Failed to listen on {endpoint}"))?;
            let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);
            Ok(tokio::spawn(
                router.serve_with_incoming_shutdown(incoming, signal),
            ))
        }
    }
}

fn flatten(
    joined: std::result::Result<
        std::result::Result<(), tonic::transport::Error>,
        tokio::task::JoinError,
    >,
) -> Result<()> {
    joined
        .context("gRPC server task failed")?
        .context("gRPC server failed")
}

fn cleanup_endpoint(endpoint: &Endpoint) {
    if let Endpoint::Unix(path) = endpoint {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to remove socket file");
            }
        }
    }
}
