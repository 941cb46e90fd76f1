//! Retry classification.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is transient
//! - Enforce the attempt budget (`1 + max_retries` attempts)
//!
//! # Design Decisions
//! - Timeouts, connection-level failures and 500/502/503/504 are transient
//! - 4xx and every other status are surfaced immediately
//! - Transport errors are classified by structured kind first; the message
//!   signature list is kept for transports that only report text

use crate::transport::{TransportError, TransportErrorKind};

/// Statuses that indicate transient server trouble.
pub const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Message fragments that identify network-level failures.
pub const RETRYABLE_SIGNATURES: [&str; 8] = [
    "failed to fetch",
    "network error",
    "connection reset",
    "connection refused",
    "econnreset",
    "econnrefused",
    "etimedout",
    "socket hang up",
];

/// Why an attempt is being retried. Used as a log field and metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    Timeout,
    Network,
    Status(u16),
}

impl RetryReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryReason::Timeout => "timeout",
            RetryReason::Network => "network",
            RetryReason::Status(_) => "server_error",
        }
    }
}

/// True if the HTTP status should be retried.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// True if the message matches a known network-failure signature.
pub fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    RETRYABLE_SIGNATURES.iter().any(|sig| lower.contains(sig))
}

/// True if the transport failure is a transient network problem.
pub fn is_retryable_transport_error(err: &TransportError) -> bool {
    match err.kind {
        TransportErrorKind::Connect
        | TransportErrorKind::Dns
        | TransportErrorKind::Reset
        | TransportErrorKind::Body
        | TransportErrorKind::TimedOut => true,
        TransportErrorKind::InvalidRequest => false,
        TransportErrorKind::Other => is_retryable_message(&err.message),
    }
}

/// Attempt budget for a single logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound on network attempts for one call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether another attempt may follow the attempt with 0-indexed `attempt`.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}
