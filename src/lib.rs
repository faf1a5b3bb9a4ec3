//! Traced dice-rolling demo service.
//!
//! A small HTTP service built with Tokio and Axum that demonstrates request
//! tracing and structured logging through the OpenTelemetry SDK.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                  DICE SERVER                   │
//!                    │                                                │
//!  Client Request    │  ┌──────────┐   ┌──────────┐   ┌────────────┐ │
//!  ──────────────────┼─▶│  trace   │──▶│  router  │──▶│  handlers  │ │
//!                    │  │middleware│   │  (axum)  │   │ rolldice   │ │
//!                    │  └──────────┘   └──────────┘   │ api1, api2 │ │
//!                    │        │                       └─────┬──────┘ │
//!                    │        │ span per request            │        │
//!                    │        ▼                             ▼        │
//!                    │  ┌──────────────────┐        ┌─────────────┐  │
//!                    │  │    telemetry     │◀───────│ peer client │──┼─▶ /api2
//!                    │  │ provider + logs  │ spans  │ (propagates │  │  (same
//!                    │  └──────────────────┘        │  context)   │  │  process)
//!                    │                              └─────────────┘  │
//!                    │  ┌───────────────────────────────────────────┐│
//!                    │  │           Cross-Cutting Concerns          ││
//!                    │  │  ┌────────┐  ┌───────────┐  ┌──────────┐  ││
//!                    │  │  │ config │  │ lifecycle │  │ timeouts │  ││
//!                    │  │  └────────┘  └───────────┘  └──────────┘  ││
//!                    │  └───────────────────────────────────────────┘│
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! Every inbound request is wrapped in a server span named after the matched
//! route pattern. Handlers open child spans and emit log records correlated
//! with the active trace context. The `/api1` handler calls `/api2` on the
//! same listener through an instrumented client that carries the trace
//! context as W3C headers, so the callee's spans join the caller's trace.

// Core subsystems
pub mod config;
pub mod http;
pub mod telemetry;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use telemetry::Telemetry;
