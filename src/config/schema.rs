//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dice server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Peer endpoint used by the chained-call handler.
    pub peer: PeerConfig,

    /// Telemetry export settings.
    pub telemetry: TelemetryConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for request handling and shutdown.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request body read timeout in seconds.
    pub read_secs: u64,

    /// Response timeout in seconds (total time to produce a response).
    pub write_secs: u64,

    /// Grace period for in-flight requests during shutdown, in seconds.
    pub drain_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 1,
            write_secs: 10,
            drain_secs: 10,
        }
    }
}

/// Peer endpoint configuration for the `/api1` → `/api2` chained call.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PeerConfig {
    /// Base URL the chained-call handler targets (e.g.
    /// "http://localhost:8080"). When unset, the service calls back into
    /// its own listener address.
    pub base_url: Option<String>,
}

/// Telemetry export settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every exported span and log record.
    pub service_name: String,

    /// OTLP collector endpoint (gRPC). Unset disables export; spans are
    /// still created so in-process behavior is unchanged.
    pub otlp_endpoint: Option<String>,

    /// Span batch flush interval in milliseconds. The SDK default of 5s is
    /// lowered to 1s so spans become visible quickly.
    pub batch_timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dice-server".to_string(),
            otlp_endpoint: Some("http://localhost:4317".to_string()),
            batch_timeout_ms: 1_000,
        }
    }
}
