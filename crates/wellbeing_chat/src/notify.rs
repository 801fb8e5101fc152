//! User-visible alerts.
//!
//! Notifications are fire-and-forget: the session hands them to a sink and
//! moves on. Nothing about the conversation depends on delivery.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Severity of a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A discrete alert for the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Alert raised when a chat request fails to settle with a reply.
    ///
    /// `location` is the host the client expected the backend on, e.g. `localhost:5001`.
    pub fn connection_error(location: &str) -> Self {
        Self::error(
            "Connection Error",
            format!(
                "Unable to connect to the AI agent. Please make sure the backend server is running on {}.",
                location
            ),
        )
    }

    /// Confirmation shown after the conversation was reset locally
    pub fn chat_reset() -> Self {
        Self::info("Chat Reset", "Conversation has been reset successfully.")
    }
}

/// Receiver for notifications
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification. Must not block and must not fail.
    fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            Severity::Error => error!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
