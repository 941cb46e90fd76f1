//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, multiplier >= 1)
//! - Check URLs, header names and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// Upper bound on configured retries.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("executor.timeout_ms must be greater than 0")]
    ZeroTimeout,

    #[error("executor.max_retries {value} exceeds limit of {limit}")]
    TooManyRetries { value: u32, limit: u32 },

    #[error("executor.retry_delay_multiplier must be a finite number >= 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error("executor.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("executor.default_headers entry '{0}' is not a valid header")]
    InvalidHeader(String),

    #[error("auth.bearer_token must not be empty")]
    EmptyToken,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let executor = &config.executor;

    if executor.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if executor.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ValidationError::TooManyRetries {
            value: executor.max_retries,
            limit: MAX_RETRIES_LIMIT,
        });
    }

    let multiplier = executor.retry_delay_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::InvalidMultiplier(multiplier));
    }

    if let Some(base) = &executor.base_url {
        match Url::parse(base) {
            Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidBaseUrl {
                url: base.clone(),
                reason: "cannot be a base".to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidBaseUrl {
                url: base.clone(),
                reason: e.to_string(),
            }),
        }
    }

    for (name, value) in &executor.default_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err()
        {
            errors.push(ValidationError::InvalidHeader(name.clone()));
        }
    }

    if matches!(&config.auth.bearer_token, Some(token) if token.trim().is_empty()) {
        errors.push(ValidationError::EmptyToken);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.executor.timeout_ms = 0;
        config.executor.retry_delay_multiplier = 0.5;
        config.executor.base_url = Some("not a url".into());
        config.auth.bearer_token = Some("  ".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::InvalidMultiplier(0.5)));
        assert!(errors.contains(&ValidationError::EmptyToken));
    }

    #[test]
    fn test_retry_limit() {
        let mut config = ClientConfig::default();
        config.executor.max_retries = 11;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "executor.max_retries 11 exceeds limit of 10");
    }

    #[test]
    fn test_rejects_nan_multiplier_and_bad_header() {
        let mut config = ClientConfig::default();
        config.executor.retry_delay_multiplier = f64::NAN;
        config.executor.default_headers.insert("bad header".into(), "v".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::InvalidHeader("bad header".into())));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ClientConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidMetricsAddress("nowhere".into())]
        );
    }
}
