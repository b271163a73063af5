use std::io;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Resolves once the process is asked to stop; used for graceful server shutdown
pub async fn shutdown_signal() {
    wait_for_signal().await;
    info!("Draining in-flight requests before exit");
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() {
    // Handle SIGTERM (sent by container runtimes on stop)
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to create SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let interrupt = async { signal_received(tokio::signal::ctrl_c().await, "SIGINT").await };

    tokio::select! {
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
        _ = interrupt => {
            info!("Received SIGINT signal, initiating graceful shutdown");
        }
    }
}

/// Platform-specific signal handling implementation
#[cfg(not(unix))]
async fn wait_for_signal() {
    signal_received(tokio::signal::ctrl_c().await, "Ctrl+C").await;
    info!("Received Ctrl+C signal, initiating graceful shutdown");
}

/// Completes for a delivered signal; a listener that failed to register never completes
async fn signal_received(result: io::Result<()>, name: &str) {
    if let Err(e) = result {
        error!("Failed to listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}
