//! Failure types reported by the executor.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::transport::{TransportError, TransportErrorKind};

/// Failure category of a settled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Every remaining attempt exceeded its deadline.
    Timeout,
    /// No response was received (connection, DNS, reset).
    Network,
    /// 5xx response after the retry budget was spent.
    Server,
    /// Any other non-2xx response.
    Client,
    /// Body did not match its declared content type.
    Decode,
    /// The request could not be built or sent at all.
    InvalidRequest,
}

/// Structured failure of one logical call.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
    pub http_status: Option<u16>,
    pub is_timeout: bool,
    pub kind: ErrorKind,
}

impl RequestError {
    pub fn timeout(limit: Duration) -> Self {
        Self {
            message: format!("request timed out after {} ms", limit.as_millis()),
            http_status: None,
            is_timeout: true,
            kind: ErrorKind::Timeout,
        }
    }

    /// Failure carried by a non-2xx response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let kind = if status >= 500 {
            ErrorKind::Server
        } else {
            ErrorKind::Client
        };
        Self {
            message: message.into(),
            http_status: Some(status),
            is_timeout: false,
            kind,
        }
    }

    pub fn decode(status: u16, err: &serde_json::Error) -> Self {
        Self {
            message: format!("failed to decode response body: {}", err),
            http_status: Some(status),
            is_timeout: false,
            kind: ErrorKind::Decode,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: None,
            is_timeout: false,
            kind: ErrorKind::InvalidRequest,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status.map(|s| s >= 500).unwrap_or(false)
    }
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        let (kind, is_timeout) = match err.kind {
            TransportErrorKind::TimedOut => (ErrorKind::Timeout, true),
            TransportErrorKind::InvalidRequest => (ErrorKind::InvalidRequest, false),
            _ => (ErrorKind::Network, false),
        };
        Self {
            message: err.message,
            http_status: None,
            is_timeout,
            kind,
        }
    }
}
