//! # Shutdown Signals
//!
//! Cancels the shared token on SIGINT or SIGTERM.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Wait for SIGINT/SIGTERM, then cancel `token`
pub async fn watch_shutdown_signal(token: CancellationToken) {
    tokio::select! {
        () = wait_for_signal() => {
            info!("Shutdown signal received");
            token.cancel();
        }
        () = token.cancelled() => {}
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
