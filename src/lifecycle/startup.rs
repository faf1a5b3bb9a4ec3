//! Startup orchestration.
//!
//! Drives the service through STARTING → RUNNING → DRAINING → STOPPED:
//! telemetry first so every later step can log and trace, then the
//! listener, then the serve loop until a signal or a serve failure, then a
//! deadline-bounded drain, and finally the telemetry flush. The exit
//! result joins the serve error and the telemetry-shutdown error.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinError;
use tokio::time::timeout;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::telemetry::{ShutdownError, Telemetry};

/// Terminal error of a service run.
///
/// A serve failure and a telemetry flush failure can occur in the same
/// run; both must be visible to the operator.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("telemetry shutdown error: {0}")]
    Telemetry(#[source] ShutdownError),

    #[error("server error: {server}; telemetry shutdown error: {telemetry}")]
    Both {
        server: io::Error,
        telemetry: ShutdownError,
    },
}

impl RunError {
    fn join(server: Option<io::Error>, telemetry: Option<ShutdownError>) -> Result<(), RunError> {
        match (server, telemetry) {
            (None, None) => Ok(()),
            (Some(server), None) => Err(RunError::Serve(server)),
            (None, Some(telemetry)) => Err(RunError::Telemetry(telemetry)),
            (Some(server), Some(telemetry)) => Err(RunError::Both { server, telemetry }),
        }
    }
}

/// Run the service through its full lifecycle.
pub async fn run(config: ServiceConfig) -> Result<(), RunError> {
    // STARTING: telemetry init also installs the log subscriber.
    let telemetry = Arc::new(Telemetry::init(&config.telemetry));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        otlp_endpoint = config.telemetry.otlp_endpoint.as_deref().unwrap_or("<disabled>"),
        service_name = %config.telemetry.service_name,
        "Configuration loaded"
    );

    // Both receivers exist before the signal task runs, so a signal arriving
    // at any point from here on is never missed.
    let shutdown = Shutdown::new();
    let graceful_rx = shutdown.subscribe();
    let drain_rx = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let server_error = serve(config, telemetry.clone(), graceful_rx, drain_rx).await;

    // STOPPED: flush buffered spans and logs, then combine results.
    let telemetry_error = telemetry.shutdown().err();
    if let Some(err) = &telemetry_error {
        tracing::error!(error = %err, "Telemetry shutdown failed");
    }

    RunError::join(server_error, telemetry_error)
}

/// Bind, serve until failure or shutdown, and drain within the deadline.
async fn serve(
    config: ServiceConfig,
    telemetry: Arc<Telemetry>,
    graceful_rx: broadcast::Receiver<()>,
    mut drain_rx: broadcast::Receiver<()>,
) -> Option<io::Error> {
    let drain = Duration::from_secs(config.timeouts.drain_secs);

    let listener = match TcpListener::bind(config.listener.bind_address.as_str()).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %err,
                "Failed to bind listener"
            );
            return Some(err);
        }
    };

    let server = HttpServer::new(config, telemetry);
    let mut server_task = tokio::spawn(server.run(listener, graceful_rx));

    // RUNNING
    tokio::select! {
        result = &mut server_task => flatten(result),
        _ = drain_rx.recv() => {
            // DRAINING: in-flight requests finish, bounded by the deadline.
            match timeout(drain, &mut server_task).await {
                Ok(result) => flatten(result),
                Err(_) => {
                    tracing::warn!(
                        deadline_secs = drain.as_secs(),
                        "Drain deadline exceeded, aborting in-flight requests"
                    );
                    server_task.abort();
                    None
                }
            }
        }
    }
}

fn flatten(result: Result<Result<(), io::Error>, JoinError>) -> Option<io::Error> {
    match result {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err),
        Err(err) => Some(io::Error::other(err)),
    }
}
