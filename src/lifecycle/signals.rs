//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into the internal shutdown signal. Runs as
//! its own task so an interruption is acted upon while requests are still
//! in flight.

use crate::lifecycle::Shutdown;

/// Wait for an interrupt signal, then trigger graceful shutdown.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Failed to install Ctrl+C handler");
        }
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
