//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout layers)
//!     → trace.rs (server span named by matched route, context injection)
//!     → handlers.rs (rolldice / api1 / api2)
//!         → client.rs (outbound call to /api2 with propagated context)
//!     → response written, span ended
//! ```

pub mod client;
pub mod handlers;
pub mod server;
pub mod trace;

pub use client::{ClientError, PeerClient};
pub use server::{AppState, HttpServer};
