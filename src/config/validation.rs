//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address parses as a socket address
//! - Check endpoint values parse as URLs
//! - Validate value ranges (timeouts and batch interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddress {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid {field} URL '{value}': {source}")]
    Endpoint {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(source) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::BindAddress {
            value: config.listener.bind_address.clone(),
            source,
        });
    }

    let endpoints = [
        ("peer.base_url", &config.peer.base_url),
        ("telemetry.otlp_endpoint", &config.telemetry.otlp_endpoint),
    ];
    for (field, value) in endpoints {
        if let Some(value) = value {
            if let Err(source) = Url::parse(value) {
                errors.push(ValidationError::Endpoint {
                    field,
                    value: value.clone(),
                    source,
                });
            }
        }
    }

    let durations = [
        ("timeouts.read_secs", config.timeouts.read_secs),
        ("timeouts.write_secs", config.timeouts.write_secs),
        ("timeouts.drain_secs", config.timeouts.drain_secs),
        ("telemetry.batch_timeout_ms", config.telemetry.batch_timeout_ms),
    ];
    for (field, value) in durations {
        if value == 0 {
            errors.push(ValidationError::ZeroValue(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_config(&ServiceConfig::default()).expect("defaults must validate");
    }

    #[test]
    fn bad_peer_url_is_reported() {
        let mut config = ServiceConfig::default();
        config.peer.base_url = Some("::not a url::".to_string());

        let errors = validate_config(&config).expect_err("should fail");
        assert!(
            matches!(errors[0], ValidationError::Endpoint { field: "peer.base_url", .. }),
            "unexpected errors: {errors:?}"
        );
    }

    #[test]
    fn zero_batch_interval_is_reported() {
        let mut config = ServiceConfig::default();
        config.telemetry.batch_timeout_ms = 0;

        let errors = validate_config(&config).expect_err("should fail");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::ZeroValue("telemetry.batch_timeout_ms")
        ));
    }
}
