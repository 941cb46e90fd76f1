//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! One attempt:
//!     → timeouts.rs (race the transport call against timeout_ms)
//!     → On failure: retries.rs (is it transient? is budget left?)
//!     → backoff.rs (sleep base * multiplier^n before retry n)
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline
//! - Backoff is exact exponential, never applied before the first attempt
//! - Retries are internal; callers only see the retry count and the final outcome

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::Backoff;
pub use retries::{RetryPolicy, RetryReason};
