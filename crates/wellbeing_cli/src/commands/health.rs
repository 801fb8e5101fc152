//! Health command - Check that the agent backend is up.

use anyhow::{Context, Result};
use clap::Args;

use wellbeing_chat::{AssistantClient, ClientConfig, HttpAssistantClient};

#[derive(Args)]
pub struct HealthArgs {
    /// Print the raw health payload as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: HealthArgs, config: ClientConfig) -> Result<()> {
    let client = HttpAssistantClient::new(config)?;

    let health = client
        .health()
        .await
        .with_context(|| format!("Health check failed for backend at {}", client.location()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    if health.is_healthy() {
        println!("✅ Backend at {} is {}", client.location(), health.status);
    } else {
        println!("⚠️  Backend at {} reported: {}", client.location(), health.status);
    }
    if let Some(timestamp) = &health.timestamp {
        println!("   Server time: {}", timestamp);
    }

    Ok(())
}
