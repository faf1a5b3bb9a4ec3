//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Init telemetry → Install subscriber → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight → Flush telemetry
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The signal waiter runs as its own task, so interruption is observed
//!   without waiting for request completion
//! - Drain is bounded by a deadline; overrun aborts the remainder
//! - Server and telemetry-shutdown errors are joined: both are reported,
//!   neither swallows the other

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, RunError};
