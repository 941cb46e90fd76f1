//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RequestExecutor produces:
//!     → tracing events (request_id, attempt, delay, status)
//!     → metrics.rs (attempt/retry/outcome counters, latency histogram)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a call and the `x-request-id` header
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
