//! Ask command - Send one question and print the reply.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use wellbeing_chat::{
    ChatError, ChatSession, ClientConfig, HttpAssistantClient, Rejection, SubmitOutcome,
};

use crate::render::ConsoleSink;

#[derive(Args)]
pub struct AskArgs {
    /// Question for the agent
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

impl AskArgs {
    pub fn question(&self) -> String {
        self.text.join(" ")
    }
}

pub async fn execute(args: AskArgs, config: ClientConfig) -> Result<()> {
    let location = config.location();
    let client = HttpAssistantClient::new(config)?;
    let session = ChatSession::new(Arc::new(client), Arc::new(ConsoleSink));

    let question = args.question();
    info!("Asking: {}", question);

    match session.submit(&question).await {
        SubmitOutcome::Replied(message) => {
            println!("{}", message.text);
            Ok(())
        }
        SubmitOutcome::Failed(message) => {
            println!("{}", message.text);
            Err(ChatError::Transport(format!("assistant backend unreachable at {}", location)).into())
        }
        SubmitOutcome::Rejected(Rejection::EmptyText) => {
            anyhow::bail!("argument: question must not be empty")
        }
        SubmitOutcome::Rejected(Rejection::RequestPending) | SubmitOutcome::Discarded => {
            anyhow::bail!("request was not completed")
        }
    }
}
