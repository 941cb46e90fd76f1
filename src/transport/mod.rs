//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! RequestExecutor
//!     → OutboundRequest (method, url, headers, body)
//!     → Transport::send (one network exchange, no retries)
//!     → TransportResponse (status, content-type, raw body)
//!       or TransportError (structured kind + message)
//! ```
//!
//! # Design Decisions
//! - The transport performs exactly one exchange; timeouts and retries live in
//!   the executor so every transport gets the same policy
//! - Failures carry a structured kind so classification does not depend on
//!   error message text

pub mod http;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use thiserror::Error;
use url::Url;

pub use self::http::HttpTransport;

/// A fully resolved request ready to be sent.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// A response whose body has been read to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// True when the content type declares a JSON body (`application/json`,
    /// `application/problem+json`, ...).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// Transport-level failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// TCP/TLS connection could not be established.
    Connect,
    /// Host name resolution failed.
    Dns,
    /// Connection was reset or closed unexpectedly.
    Reset,
    /// The response body could not be read to completion.
    Body,
    /// The transport gave up on its own deadline.
    TimedOut,
    /// The request could not be built (bad header, bad URL scheme, ...).
    InvalidRequest,
    Other,
}

/// Errors that can occur while sending a request.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// One network exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}
