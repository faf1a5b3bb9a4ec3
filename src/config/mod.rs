//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → environment overrides (OTEL_* variables)
//!     → ServiceConfig (validated, immutable)
//!     → shared with subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow running with no config file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Telemetry destination is deployment detail: file value, then
//!   environment variable, never hard-coded

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::ServiceConfig;
pub use schema::ListenerConfig;
pub use schema::PeerConfig;
pub use schema::TelemetryConfig;
pub use schema::TimeoutConfig;
