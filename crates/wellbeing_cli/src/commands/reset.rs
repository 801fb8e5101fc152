//! Reset command - Clear the agent's conversation memory.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use wellbeing_chat::{AssistantClient, ClientConfig, HttpAssistantClient};

#[derive(Args)]
pub struct ResetArgs {}

pub async fn execute(_args: ResetArgs, config: ClientConfig) -> Result<()> {
    let client = HttpAssistantClient::new(config)?;
    info!("Resetting conversation at {}", client.location());

    client
        .reset()
        .await
        .with_context(|| format!("Reset failed for backend at {}", client.location()))?;

    println!("✅ Conversation has been reset successfully.");
    Ok(())
}
