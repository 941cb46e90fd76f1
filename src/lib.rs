//! Resilient HTTP request executor.
//!
//! Wraps one outbound REST call with a per-attempt timeout, retries transient
//! failures with exponential backoff, and exposes an observable
//! Idle/Loading/Success/Error/Timeout lifecycle.

pub mod config;
pub mod executor;
pub mod notification;
pub mod observability;
pub mod resilience;
pub mod transport;

pub use config::ClientConfig;
pub use executor::{
    Credential, ErrorKind, Payload, RequestError, RequestExecutor, RequestOptions, RequestState,
    RequestStatus,
};
