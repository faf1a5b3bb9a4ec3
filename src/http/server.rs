//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (trace instrumentation, timeouts)
//! - Serve on a caller-provided listener with graceful shutdown
//!
//! # Design Decisions
//! - The trace middleware is the outermost layer: every request gets a
//!   server span regardless of which route (or none) matches
//! - Body-read and response timeouts bound resource consumption from slow
//!   clients
//! - The peer base URL defaults to the bound listener address, so the
//!   chained call targets this same process unless configured otherwise

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::map_request_body::MapRequestBodyLayer;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutBody, TimeoutLayer};

use crate::config::ServiceConfig;
use crate::http::client::PeerClient;
use crate::http::{handlers, trace};
use crate::telemetry::Telemetry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<Telemetry>,
    pub client: PeerClient,
    /// Base URL for the `/api1` → `/api2` chained call.
    pub peer_base: String,
}

/// HTTP server for the dice service.
pub struct HttpServer {
    config: ServiceConfig,
    telemetry: Arc<Telemetry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, telemetry: Arc<Telemetry>) -> Self {
        Self { config, telemetry }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(&self, state: AppState) -> Router {
        Router::new()
            .route("/rolldice/", get(handlers::rolldice))
            .route("/rolldice/{player}", get(handlers::rolldice))
            .route("/api1", get(handlers::api1))
            .route("/api2", get(handlers::api2))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.write_secs,
            )))
            // The body timeout changes the request body type, so it is
            // composed with a mapping back to axum's body in one layer.
            .layer(
                ServiceBuilder::new()
                    .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
                        self.config.timeouts.read_secs,
                    )))
                    .layer(MapRequestBodyLayer::new(|body: TimeoutBody<Body>| Body::new(body))),
            )
            .layer(middleware::from_fn_with_state(state, trace::trace_requests))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        let peer_base = self
            .config
            .peer
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{addr}"));

        let state = AppState {
            telemetry: self.telemetry.clone(),
            client: PeerClient::new(self.telemetry.clone()),
            peer_base,
        };
        let app = self.build_router(state);

        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
