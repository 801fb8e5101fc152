//! Wellbeing assistant CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Assistant backend unreachable

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod render;

use commands::{Cli, Commands};
use wellbeing_chat::{ChatError, ClientConfig};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const BACKEND_UNREACHABLE: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let workspace_root = std::env::current_dir()?;
    let config = ClientConfig::load(cli.api_url.as_deref(), &workspace_root)?;
    tracing::debug!(base_url = %config.base_url, "Resolved backend configuration");

    match cli.command.unwrap_or_default() {
        Commands::Chat(args) => commands::chat::execute(args, config).await,
        Commands::Ask(args) => commands::ask::execute(args, config).await,
        Commands::Reset(args) => commands::reset::execute(args, config).await,
        Commands::Health(args) => commands::health::execute(args, config).await,
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "wellbeing=debug,wellbeing_chat=debug,warn"
    } else if cli.quiet {
        "error"
    } else {
        "wellbeing=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_result = if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    };

    if let Err(e) = log_result {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<ChatError>() {
        Some(ChatError::Config(_)) => ExitCodes::INVALID_ARGS,
        Some(err) if err.is_backend_failure() => ExitCodes::BACKEND_UNREACHABLE,
        Some(_) => ExitCodes::GENERAL_ERROR,
        None if e.to_string().to_lowercase().contains("argument") => ExitCodes::INVALID_ARGS,
        None => ExitCodes::GENERAL_ERROR,
    }
}
