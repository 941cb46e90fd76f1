//! Exponential backoff between retry attempts.

use std::time::Duration;

/// Fixed exponential backoff: `base_ms * multiplier^retry`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    base_ms: u64,
    multiplier: f64,
}

impl Backoff {
    pub fn new(base_ms: u64, multiplier: f64) -> Self {
        Self { base_ms, multiplier }
    }

    /// Delay to wait before retry number `retry` (0-indexed).
    ///
    /// The first attempt never waits, so there is no delay for "attempt 0";
    /// `delay(0)` is the wait between the first and second attempts.
    pub fn delay(&self, retry: u32) -> Duration {
        calculate_backoff(retry, self.base_ms, self.multiplier)
    }
}

/// Calculate the exponential backoff delay before retry `retry`.
///
/// Saturates at `u64::MAX` milliseconds instead of overflowing.
pub fn calculate_backoff(retry: u32, base_ms: u64, multiplier: f64) -> Duration {
    let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
    let delay_ms = base_ms as f64 * multiplier.powi(exponent);

    if !delay_ms.is_finite() || delay_ms >= u64::MAX as f64 {
        return Duration::from_millis(u64::MAX);
    }

    Duration::from_millis(delay_ms.max(0.0).round() as u64)
}
