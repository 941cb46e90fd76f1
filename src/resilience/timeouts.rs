//! Per-attempt deadline enforcement.
//!
//! # Responsibilities
//! - Race one attempt against its deadline
//! - Drop the losing future so a late response is discarded
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

/// Outcome of a deadline race.
#[derive(Debug, PartialEq, Eq)]
pub enum Deadline<T> {
    Completed(T),
    Elapsed,
}

/// Run `fut` with a deadline of `limit`.
///
/// When the deadline fires first the future is dropped, cancelling whatever
/// I/O it had in flight.
pub async fn with_deadline<F, T>(limit: Duration, fut: F) -> Deadline<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(value) => Deadline::Completed(value),
        Err(_) => Deadline::Elapsed,
    }
}
