//! User-facing failure notifications.
//!
//! # Responsibilities
//! - Pick one human-readable message per terminal failure
//! - Deliver it to a pluggable sink (log, UI channel)
//!
//! # Design Decisions
//! - Fixed priority: timeout > network > 5xx > 404 > 401 > 403 > generic
//! - Only settled failures notify; retried attempts stay silent

use serde::Serialize;
use tokio::sync::mpsc;

use crate::executor::error::{ErrorKind, RequestError};

/// Which user-facing message a failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    Timeout,
    Network,
    Server,
    NotFound,
    Unauthorized,
    Forbidden,
    Generic,
}

impl NoticeCategory {
    pub fn for_error(err: &RequestError) -> Self {
        if err.is_timeout {
            NoticeCategory::Timeout
        } else if err.kind == ErrorKind::Network {
            NoticeCategory::Network
        } else if err.is_server_error() {
            NoticeCategory::Server
        } else {
            match err.http_status {
                Some(404) => NoticeCategory::NotFound,
                Some(401) => NoticeCategory::Unauthorized,
                Some(403) => NoticeCategory::Forbidden,
                _ => NoticeCategory::Generic,
            }
        }
    }
}

/// A message ready to show to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub category: NoticeCategory,
    pub message: String,
    pub http_status: Option<u16>,
}

impl Notice {
    pub fn from_error(err: &RequestError) -> Self {
        Self {
            category: NoticeCategory::for_error(err),
            message: user_message(err),
            http_status: err.http_status,
        }
    }
}

/// Human-readable message for a terminal failure.
pub fn user_message(err: &RequestError) -> String {
    let fixed = match NoticeCategory::for_error(err) {
        NoticeCategory::Timeout => "Request timed out. Please try again.",
        NoticeCategory::Network => "Network error. Please check your connection.",
        NoticeCategory::Server => "Server error. Please try again later.",
        NoticeCategory::NotFound => "The requested resource was not found.",
        NoticeCategory::Unauthorized => "Your session is not authorized. Please sign in again.",
        NoticeCategory::Forbidden => "You do not have permission to perform this action.",
        NoticeCategory::Generic if !err.message.is_empty() => return err.message.clone(),
        NoticeCategory::Generic => "An unexpected error occurred.",
    };
    fixed.to_string()
}

/// Destination for failure notices.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(
            category = ?notice.category,
            status = ?notice.http_status,
            "{}",
            notice.message
        );
    }
}

/// Forwards notices to a UI layer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notice: &Notice) {
        if self.tx.send(notice.clone()).is_err() {
            tracing::debug!("Notice receiver dropped; discarding notice");
        }
    }
}
