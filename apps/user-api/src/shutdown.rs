use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed is
/// logged and treated as never firing.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Waits until shutdown has been requested on `rx`.
pub async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    // A dropped sender also means nobody will ask us to keep running.
    let _ = rx.wait_for(|requested| *requested).await;
}

/// Resolves `timeout` after shutdown was requested, bounding connection drain.
pub async fn drain_deadline(rx: watch::Receiver<bool>, timeout: Duration) {
    shutdown_requested(rx).await;
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "allowing connections to drain"
    );
    tokio::time::sleep(timeout).await;
}
