//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! handlers & middleware
//!     → provider.rs (spans via the shared Telemetry handle)
//!     → tracing macros (log events)
//!         → logging.rs (console fmt layer)
//!         → OTel bridge (log records tagged with the active trace context)
//!
//! Export:
//!     spans → batch processor (1s flush) → OTLP collector
//!     logs  → batch processor → OTLP collector
//! ```
//!
//! # Design Decisions
//! - No process-global provider registration: the `Telemetry` handle is
//!   constructed once and passed explicitly to every component
//! - Fail-open: exporter construction failure degrades export, never
//!   prevents the service from starting
//! - Shutdown flushes both providers and reports both failures

pub mod logging;
pub mod provider;

pub use provider::{ShutdownError, Telemetry};
