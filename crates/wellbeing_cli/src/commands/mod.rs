//! CLI command definitions.
//!
//! Without a subcommand the CLI starts an interactive chat.

use clap::{Parser, Subcommand};

pub mod ask;
pub mod chat;
pub mod health;
pub mod reset;

/// Wellbeing - terminal client for the AI Health & Wellbeing Agent
#[derive(Parser)]
#[command(name = "wellbeing")]
#[command(version, about = "Terminal client for the AI Health & Wellbeing Agent")]
#[command(long_about = r#"
Talk to the AI Health & Wellbeing Agent from your terminal.

COMMANDS:
  chat    → Interactive conversation (default)
  ask     → Send a single question and print the reply
  reset   → Clear the agent's conversation memory
  health  → Check that the agent backend is up

The backend location is taken from --api-url, WELLBEING_API_URL,
.wellbeing/settings.json ("apiBaseUrl"), or http://localhost:5001.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Assistant backend unreachable
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the assistant backend
    #[arg(long, global = true, env = "WELLBEING_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation
    Chat(chat::ChatArgs),

    /// Ask a single question
    Ask(ask::AskArgs),

    /// Reset the agent's conversation memory
    Reset(reset::ResetArgs),

    /// Check backend health
    Health(health::HealthArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Chat(chat::ChatArgs::default())
    }
}
