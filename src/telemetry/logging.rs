//! Structured logging setup.
//!
//! Installs a `tracing` subscriber with two sinks: a console formatter and
//! the OpenTelemetry bridge, which turns events into log records tagged
//! with the trace context that is current when they are emitted.

use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global subscriber.
///
/// Safe to call when a subscriber is already installed (integration tests
/// set their own); the existing subscriber then stays in place.
pub fn init(logger_provider: &SdkLoggerProvider) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dice_server=debug,tower_http=debug".into());

    // Events from the exporter's own HTTP/gRPC stack must not feed back
    // into the bridge, or every export generates more telemetry to export.
    let bridge_filter = EnvFilter::new("info")
        .add_directive("hyper=off".parse().expect("static directive"))
        .add_directive("h2=off".parse().expect("static directive"))
        .add_directive("tonic=off".parse().expect("static directive"))
        .add_directive("tower=off".parse().expect("static directive"))
        .add_directive("opentelemetry=off".parse().expect("static directive"));

    let bridge = OpenTelemetryTracingBridge::new(logger_provider).with_filter(bridge_filter);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(console_filter))
        .with(bridge)
        .try_init();
}
