//! Terminal rendering of the conversation.
//!
//! Everything here is a pure function of session state, except
//! [`ConsoleSink`] which prints notifications to stderr.

use wellbeing_chat::{Message, Notification, NotificationSink, SessionSnapshot};

const CONTINUATION_INDENT: &str = "        ";

/// Shown below the thread while a request is outstanding
pub const THINKING: &str = "        Assistant is thinking...";

/// Render one message as `[HH:MM] Speaker: text`, indenting continuation lines
pub fn message(message: &Message) -> String {
    let mut lines = message.text.lines();
    let first = lines.next().unwrap_or_default();

    let mut out = format!(
        "[{}] {}: {}",
        message.display_time(),
        message.origin.display_name(),
        first
    );
    for line in lines {
        out.push('\n');
        out.push_str(CONTINUATION_INDENT);
        out.push_str(line);
    }
    out
}

/// Render the whole thread, with the thinking indicator when pending
pub fn transcript(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    for m in &snapshot.messages {
        out.push_str(&message(m));
        out.push('\n');
    }
    if snapshot.pending {
        out.push_str(THINKING);
        out.push('\n');
    }
    out
}

/// Render a notification as `[severity] Title: description`
pub fn notification(notification: &Notification) -> String {
    format!(
        "[{}] {}: {}",
        notification.severity.as_str(),
        notification.title,
        notification.description
    )
}

/// Notification sink that prints to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, n: Notification) {
        eprintln!("{}", notification(&n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellbeing_chat::GREETING;

    #[test]
    fn test_single_line_message() {
        let m = Message::user("hello");
        let rendered = message(&m);
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] You: hello"));
    }

    #[test]
    fn test_multi_line_message_is_indented() {
        let m = Message::assistant("Try:\n- walking\n- stretching");
        let rendered = message(&m);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Assistant: Try:"));
        assert_eq!(lines[1], "        - walking");
        assert_eq!(lines[2], "        - stretching");
    }

    #[test]
    fn test_transcript_shows_thinking_when_pending() {
        let mut snapshot = SessionSnapshot {
            session_id: "s".to_string(),
            messages: vec![Message::greeting()],
            pending: false,
            draft: String::new(),
            generation: 0,
        };
        let idle = transcript(&snapshot);
        assert!(idle.contains(GREETING));
        assert!(!idle.contains(THINKING));

        snapshot.pending = true;
        assert!(transcript(&snapshot).ends_with(&format!("{}\n", THINKING)));
    }

    #[test]
    fn test_notification_format() {
        let rendered = notification(&Notification::chat_reset());
        assert_eq!(
            rendered,
            "[info] Chat Reset: Conversation has been reset successfully."
        );
    }
}
