//! Request execution subsystem.
//!
//! # Data Flow
//! ```text
//! caller (screen, CLI)
//!     → client.rs (execute / get / post / put / delete / retry / reset)
//!     → options.rs (method, headers, body, credential)
//!     → resilience (deadline, classification, backoff)
//!     → transport (one network exchange per attempt)
//!     → state.rs (decode body, settle RequestState)
//!     → notification (one notice per terminal failure)
//! ```
//!
//! # State Transitions
//! ```text
//! Idle → Loading → Success | Error | Timeout
//! any  → Loading          (new call)
//! any  → Idle             (reset)
//! ```

pub mod client;
pub mod error;
pub mod options;
pub mod state;

pub use client::RequestExecutor;
pub use error::{ErrorKind, RequestError};
pub use options::{Credential, RequestOptions};
pub use state::{Payload, RequestState, RequestStatus};
