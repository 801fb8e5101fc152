//! Chat command - Interactive conversation with the agent.
//!
//! Submissions run as background tasks so `/reset` and `/quit` stay
//! responsive while the agent is still answering.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use wellbeing_chat::{ChatSession, ClientConfig, HttpAssistantClient, Rejection, SubmitOutcome};

use crate::render::{self, ConsoleSink};

const HELP: &str = "Type a message and press Enter. Commands: /send (resend draft), /reset, /history, /help, /quit";

#[derive(Args, Default)]
pub struct ChatArgs {
    /// Clear the agent's memory before starting
    #[arg(long)]
    fresh: bool,
}

/// A line of user input
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Text(String),
    Send,
    Reset,
    History,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/quit" | "/exit" => Input::Quit,
        "/reset" | "/new" => Input::Reset,
        "/history" => Input::History,
        "/help" => Input::Help,
        "/send" => Input::Send,
        _ => Input::Text(line.to_string()),
    }
}

pub async fn execute(args: ChatArgs, config: ClientConfig) -> Result<()> {
    info!("Connecting to assistant at {}", config.base_url);

    let client = HttpAssistantClient::new(config)?;
    let session = Arc::new(ChatSession::new(Arc::new(client), Arc::new(ConsoleSink)));

    if args.fresh {
        let _ = start_reset(&session);
    }

    print!("{}", render::transcript(&session.snapshot()));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut inflight: JoinSet<SubmitOutcome> = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };

                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{}", HELP),
                    Input::History => print!("{}", render::transcript(&session.snapshot())),
                    Input::Reset => {
                        let _ = start_reset(&session);
                        print!("{}", render::transcript(&session.snapshot()));
                    }
                    Input::Send => spawn_submit(&mut inflight, &session, session.draft()),
                    Input::Text(text) => spawn_submit(&mut inflight, &session, text),
                }
            }
            Some(joined) = inflight.join_next() => {
                let outcome = joined.context("Chat task failed")?;
                report(&outcome, &session);
            }
        }
    }

    if !inflight.is_empty() {
        debug!(tasks = inflight.len(), "Abandoning outstanding requests");
    }
    Ok(())
}

/// Submit `text` on a background task.
///
/// Each task owns its line, so lines typed in quick succession cannot
/// overwrite each other. A line refused because a reply is outstanding is
/// parked in the draft for `/send`.
fn spawn_submit(inflight: &mut JoinSet<SubmitOutcome>, session: &Arc<ChatSession>, text: String) {
    let session = Arc::clone(session);
    inflight.spawn(async move {
        let outcome = session.submit(&text).await;
        if outcome == SubmitOutcome::Rejected(Rejection::RequestPending) {
            session.set_draft(text);
        }
        outcome
    });
}

/// Reset the conversation now and tell the backend in the background.
///
/// The input loop never waits on the backend reset.
fn start_reset(session: &Arc<ChatSession>) -> JoinHandle<bool> {
    session.reset_local();
    let session = Arc::clone(session);
    tokio::spawn(async move { session.reset_remote().await })
}

/// Console text for a finished submission, if it has any
fn describe(outcome: &SubmitOutcome) -> Option<String> {
    match outcome {
        SubmitOutcome::Replied(message) | SubmitOutcome::Failed(message) => {
            Some(render::message(message))
        }
        SubmitOutcome::Rejected(Rejection::RequestPending) => Some(format!(
            "(still waiting for the previous reply; your text is kept, use /send to retry)\n{}",
            render::THINKING
        )),
        SubmitOutcome::Rejected(Rejection::EmptyText) | SubmitOutcome::Discarded => None,
    }
}

fn report(outcome: &SubmitOutcome, session: &ChatSession) {
    if let Some(text) = describe(outcome) {
        println!("{}", text);
    } else if *outcome == SubmitOutcome::Discarded {
        debug!(session = session.id(), "Reply arrived after reset and was dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellbeing_chat::{MockAssistant, Origin, RecordingSink, GREETING};

    fn session_with(mock: &MockAssistant) -> Arc<ChatSession> {
        Arc::new(ChatSession::new(
            Arc::new(mock.clone()),
            Arc::new(RecordingSink::new()),
        ))
    }

    async fn drain(inflight: &mut JoinSet<SubmitOutcome>) -> Vec<SubmitOutcome> {
        let mut outcomes = Vec::new();
        while let Some(joined) = inflight.join_next().await {
            outcomes.push(joined.unwrap());
        }
        outcomes
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("  /reset "), Input::Reset);
        assert_eq!(parse_input("/new"), Input::Reset);
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/send"), Input::Send);
        assert_eq!(parse_input("/help"), Input::Help);
    }

    #[test]
    fn test_parse_text_is_kept_raw() {
        assert_eq!(
            parse_input("  I feel tired  "),
            Input::Text("  I feel tired  ".to_string())
        );
        assert_eq!(parse_input(""), Input::Text(String::new()));
    }

    #[tokio::test]
    async fn test_lines_typed_back_to_back_are_both_sent() {
        let mock = MockAssistant::new();
        let session = session_with(&mock);
        let mut inflight = JoinSet::new();

        spawn_submit(&mut inflight, &session, "first line".to_string());
        spawn_submit(&mut inflight, &session, "second line".to_string());
        let outcomes = drain(&mut inflight).await;

        assert_eq!(outcomes.len(), 2);
        let sent: Vec<_> = mock
            .get_method_calls("chat")
            .into_iter()
            .filter_map(|c| c.message)
            .collect();
        assert_eq!(sent, vec!["first line", "second line"]);

        let user_texts: Vec<_> = session
            .messages()
            .into_iter()
            .filter(|m| m.origin == Origin::User)
            .map(|m| m.text)
            .collect();
        assert_eq!(user_texts, vec!["first line", "second line"]);
    }

    #[tokio::test]
    async fn test_line_sent_while_pending_is_kept_and_reported() {
        let mock = MockAssistant::new().hold_replies();
        let session = session_with(&mock);
        let mut inflight = JoinSet::new();

        spawn_submit(&mut inflight, &session, "first line".to_string());
        while !session.is_pending() {
            tokio::task::yield_now().await;
        }

        spawn_submit(&mut inflight, &session, "second line".to_string());
        let rejected = inflight.join_next().await.unwrap().unwrap();

        assert_eq!(rejected, SubmitOutcome::Rejected(Rejection::RequestPending));
        assert_eq!(session.draft(), "second line");
        let text = describe(&rejected).unwrap();
        assert!(text.contains("/send"));
        assert!(text.contains(render::THINKING));
        assert_eq!(mock.get_method_calls("chat").len(), 1);

        mock.release();
        let replied = inflight.join_next().await.unwrap().unwrap();
        assert!(matches!(replied, SubmitOutcome::Replied(_)));
        assert_eq!(session.draft(), "second line");
    }

    #[tokio::test]
    async fn test_reset_returns_while_backend_hangs() {
        let mock = MockAssistant::new().hang_reset();
        let session = session_with(&mock);
        session.submit("hello").await;
        session.set_draft("unsent");

        let remote = start_reset(&session);

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, GREETING);
        assert_eq!(session.draft(), "");
        assert!(!session.is_pending());
        assert!(!remote.is_finished());
        remote.abort();
    }

    #[test]
    fn test_describe_skips_silent_outcomes() {
        assert!(describe(&SubmitOutcome::Rejected(Rejection::EmptyText)).is_none());
        assert!(describe(&SubmitOutcome::Discarded).is_none());
    }
}
