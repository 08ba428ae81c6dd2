//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid)
//! - Check settings that only make sense together
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before a document is published to the rest of the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token must not be empty")]
    MissingToken,

    #[error("port must not be 0")]
    InvalidPort,

    #[error("topic #{index} has an empty name")]
    EmptyTopicName { index: usize },

    #[error("ping_interval must be greater than 0 when healthcheck_uuid is set")]
    MissingPingInterval,

    #[error("auth_header must be set when auth_token is set")]
    MissingAuthHeader,

    #[error("{field} must be greater than 0")]
    ZeroTimeout { field: &'static str },

    #[error("metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.token.trim().is_empty() {
        errors.push(ValidationError::MissingToken);
    }

    if config.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    for (index, topic) in config.topics.iter().enumerate() {
        if topic.name.trim().is_empty() {
            errors.push(ValidationError::EmptyTopicName { index });
        }
    }

    if config.heartbeat_enabled() && config.ping_interval == 0 {
        errors.push(ValidationError::MissingPingInterval);
    }

    if config.auth_enabled() && config.auth_header.trim().is_empty() {
        errors.push(ValidationError::MissingAuthHeader);
    }

    for (field, value) in [
        ("api_timeout_secs", config.api_timeout_secs),
        ("request_timeout_secs", config.request_timeout_secs),
        ("formatter_timeout_secs", config.formatter_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if let Some(addr) = &config.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
