//! # wellbeing_chat - Conversation core for the wellbeing assistant client
//!
//! This crate owns the message thread shown to the user and the lifecycle of
//! requests sent to the assistant backend:
//! - Ordered conversation log that always starts with a greeting
//! - Single in-flight request with admission control
//! - Fixed fallback message and an error notification when the backend fails
//! - Reset that never depends on the backend being reachable
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  submit/reset  ┌─────────────────┐   HTTP   ┌─────────────────┐
//! │   Front end     │───────────────▶│   ChatSession   │─────────▶│ AssistantClient │
//! └─────────────────┘                └────────┬────────┘          └─────────────────┘
//!         ▲                                   │
//!         │ snapshot                          ├──────────▶ ConversationLog
//!         └───────────────────────────────────┤
//!                                             └──────────▶ NotificationSink
//! ```

pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod mock;
pub mod notify;
pub mod session;
pub mod types;

pub use client::{AssistantClient, ChatReply, HealthStatus, HttpAssistantClient};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, SETTINGS_PATH};
pub use conversation::ConversationLog;
pub use error::{ChatError, ChatResult};
pub use mock::{CapturedCall, MockAssistant, MockResponse, RecordingSink};
pub use notify::{Notification, NotificationSink, Severity, TracingSink};
pub use session::{ChatSession, Rejection, ResetOutcome, SessionSnapshot, SubmitOutcome};
pub use types::{Message, MessageId, Origin, FALLBACK_REPLY, GREETING};
