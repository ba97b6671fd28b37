//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and upstream base URLs
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - The API key is not checked here; its absence is reported per request

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    check_base_url(
        "dashscope.default_base_url",
        &config.dashscope.default_base_url,
        &mut errors,
    );
    check_base_url(
        "dashscope.singapore_base_url",
        &config.dashscope.singapore_base_url,
        &mut errors,
    );

    if config.dashscope.model.trim().is_empty() {
        errors.push(ValidationError::Empty("dashscope.model"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        field,
        value: value.to_string(),
        reason,
    };

    match Url::parse(value) {
        Ok(url) if url.cannot_be_a_base() => errors.push(invalid("not a base URL".into())),
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(invalid(format!("unsupported scheme '{}'", url.scheme())))
        }
        Ok(_) => {}
        Err(e) => errors.push(invalid(e.to_string())),
    }
}
