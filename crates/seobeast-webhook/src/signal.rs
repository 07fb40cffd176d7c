use tracing::{info, warn};

/// Completes when the process is asked to stop.
pub async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => info!("SIGINT received, draining webhook server"),
        () = terminate() => info!("SIGTERM received, draining webhook server"),
    }
}

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            warn!(error = %error, "Cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
