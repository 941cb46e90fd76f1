//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::executor::options::Credential;

/// Root configuration for the request executor and its CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout, retry and notification policy.
    pub executor: ExecutorConfig,

    /// Outbound credentials.
    pub auth: AuthConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Executor policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Deadline for each individual attempt, in milliseconds.
    pub timeout_ms: u64,

    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    pub retry_delay_ms: u64,

    /// Backoff growth factor between retries.
    pub retry_delay_multiplier: f64,

    /// Emit a notice when a call settles as a failure.
    pub notify_on_error: bool,

    /// Base URL that relative targets are resolved against.
    pub base_url: Option<String>,

    /// Headers sent with every request unless the caller overrides them.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            retry_delay_multiplier: 2.0,
            notify_on_error: true,
            base_url: None,
            default_headers: BTreeMap::new(),
        }
    }
}

/// Outbound credential configuration.
#[derive(Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
}

impl AuthConfig {
    pub fn credential(&self) -> Option<Credential> {
        self.bearer_token.clone().map(Credential::Bearer)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(config.retry_delay_multiplier, 2.0);
        assert!(config.notify_on_error);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [executor]
            max_retries = 5
            base_url = "https://erp.example.com/api/"

            [executor.default_headers]
            x-branch = "pune"

            [auth]
            bearer_token = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.executor.max_retries, 5);
        assert_eq!(config.executor.timeout_ms, 10_000);
        assert_eq!(config.executor.default_headers["x-branch"], "pune");
        assert_eq!(config.auth.credential(), Some(Credential::Bearer("abc".into())));
        assert!(!format!("{:?}", config.auth).contains("abc"));
    }
}
