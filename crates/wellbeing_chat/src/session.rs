//! Chat session.
//!
//! A [`ChatSession`] owns the conversation log and the request state. Its
//! methods are the only way to mutate either:
//!
//! - `submit` admits at most one request at a time, appends the user's text,
//!   and on settlement appends exactly one assistant message.
//! - `reset` reinstalls the greeting immediately and tells the backend to
//!   forget its memory on a best-effort basis.
//!
//! ```text
//!   Idle ──submit(valid)──▶ Pending ──settle──▶ Idle
//!    ▲  └─submit(invalid)─┘   │  └─submit(any)─┘
//!    └────────reset───────────┘
//! ```
//!
//! Every admitted request carries the log generation it was issued under.
//! `reset` bumps the generation, so a settlement arriving afterwards is
//! dropped instead of writing into the fresh log.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::{AssistantClient, ChatReply};
use crate::conversation::ConversationLog;
use crate::error::ChatResult;
use crate::notify::{Notification, NotificationSink};
use crate::types::Message;

/// Why a submission was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text was empty or whitespace only
    EmptyText,
    /// Another request is still outstanding
    RequestPending,
}

/// Result of a call to [`ChatSession::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not admitted; nothing changed
    Rejected(Rejection),
    /// The backend replied; holds the appended assistant message
    Replied(Message),
    /// The request failed; holds the appended fallback message
    Failed(Message),
    /// The log was reset while the request was in flight; nothing was appended
    Discarded,
}

impl SubmitOutcome {
    /// The assistant message appended by this submission, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Replied(message) | Self::Failed(message) => Some(message),
            Self::Rejected(_) | Self::Discarded => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of a call to [`ChatSession::reset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Log generation installed by the reset
    pub generation: u64,
    /// Whether the backend confirmed its own reset
    pub remote_acknowledged: bool,
}

/// Point-in-time copy of the session, for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub messages: Vec<Message>,
    pub pending: bool,
    pub draft: String,
    pub generation: u64,
}

/// Log generation a request was issued under
#[derive(Debug, Clone, Copy)]
struct RequestTicket {
    generation: u64,
}

struct SessionState {
    log: ConversationLog,
    pending: bool,
    draft: String,
    generation: u64,
}

/// Conversation log plus request coordination for one user session
pub struct ChatSession {
    id: String,
    client: Arc<dyn AssistantClient>,
    notifier: Arc<dyn NotificationSink>,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Create a session seeded with the greeting
    pub fn new(client: Arc<dyn AssistantClient>, notifier: Arc<dyn NotificationSink>) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        debug!(session = %id, "Created chat session");

        Self {
            id,
            client,
            notifier,
            state: Mutex::new(SessionState {
                log: ConversationLog::with_greeting(),
                pending: false,
                draft: String::new(),
                generation: 0,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Submit user text to the assistant.
    ///
    /// Returns without side effects when the text is blank or a request is
    /// already outstanding. Otherwise appends the trimmed text, waits for the
    /// backend, and appends the reply or the fallback message.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let ticket = match self.admit(text) {
            Ok(ticket) => ticket,
            Err(rejection) => {
                debug!(session = %self.id, ?rejection, "Submission ignored");
                return SubmitOutcome::Rejected(rejection);
            }
        };

        let result = self.client.chat(text).await;
        self.settle(ticket, result)
    }

    /// Submit whatever is currently in the draft
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.draft();
        self.submit(&draft).await
    }

    /// Reset the conversation to the greeting.
    ///
    /// The local reset happens before the backend is contacted and does not
    /// depend on it; a failed backend reset is only logged.
    pub async fn reset(&self) -> ResetOutcome {
        let generation = self.reset_local();
        let remote_acknowledged = self.reset_remote().await;

        ResetOutcome {
            generation,
            remote_acknowledged,
        }
    }

    /// Reinstall the greeting, clear request state, and confirm to the user.
    ///
    /// Returns the new log generation. In-flight settlements from earlier
    /// generations are dropped when they arrive.
    pub fn reset_local(&self) -> u64 {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.log.replace_all(Message::greeting());
            state.pending = false;
            state.draft.clear();
            state.generation
        };
        info!(session = %self.id, generation, "Conversation reset");
        self.notifier.notify(Notification::chat_reset());
        generation
    }

    /// Ask the backend to forget its memory. Failures are logged, never surfaced.
    pub async fn reset_remote(&self) -> bool {
        match self.client.reset().await {
            Ok(()) => {
                debug!(session = %self.id, "Backend reset acknowledged");
                true
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "Backend reset failed");
                false
            }
        }
    }

    /// Replace the not-yet-submitted input text
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Copy of every message in the log
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().log.messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Always false: the log holds at least the greeting
    pub fn is_empty(&self) -> bool {
        self.state.lock().log.is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            session_id: self.id.clone(),
            messages: state.log.messages().to_vec(),
            pending: state.pending,
            draft: state.draft.clone(),
            generation: state.generation,
        }
    }

    // Admission control: validate, append the user message, and lock
    fn admit(&self, text: &str) -> Result<RequestTicket, Rejection> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Rejection::EmptyText);
        }

        let mut state = self.state.lock();
        if state.pending {
            return Err(Rejection::RequestPending);
        }

        state.log.append(Message::user(trimmed));
        state.draft.clear();
        state.pending = true;

        debug!(
            session = %self.id,
            generation = state.generation,
            chars = trimmed.chars().count(),
            "Request admitted"
        );
        Ok(RequestTicket {
            generation: state.generation,
        })
    }

    fn settle(&self, ticket: RequestTicket, result: ChatResult<ChatReply>) -> SubmitOutcome {
        let (outcome, notification) = {
            let mut state = self.state.lock();

            if state.generation != ticket.generation {
                debug!(
                    session = %self.id,
                    issued = ticket.generation,
                    current = state.generation,
                    "Dropping settlement from before reset"
                );
                return SubmitOutcome::Discarded;
            }

            state.pending = false;
            match result {
                Ok(reply) => {
                    let message = Message::assistant(reply.response);
                    state.log.append(message.clone());
                    (SubmitOutcome::Replied(message), None)
                }
                Err(e) => {
                    warn!(session = %self.id, error = %e, "Chat request failed");
                    let message = Message::fallback();
                    state.log.append(message.clone());
                    (
                        SubmitOutcome::Failed(message),
                        Some(Notification::connection_error(&self.client.location())),
                    )
                }
            }
        };

        if let Some(notification) = notification {
            self.notifier.notify(notification);
        }
        outcome
    }
}
