//! Pipewright CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Template clone failure
//! - 4: Manifest or questionnaire failure
//! - 5: Generated file conflict

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod diagram;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CLONE_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const FILE_CONFLICT: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env().add_directive("warn".parse().unwrap());
    for target in ["pipewright_cli", "pipewright_core", "pipewright_templates"] {
        filter = filter.add_directive(format!("{target}={level}").parse().unwrap());
    }
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args).await,
        Commands::Bootstrap(args) => commands::bootstrap::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let msg = format!("{:#}", e).to_lowercase();

    if msg.contains("clone") {
        ExitCodes::CLONE_ERROR
    } else if msg.contains("manifest") || msg.contains("questions") {
        ExitCodes::TEMPLATE_ERROR
    } else if msg.contains("already exist") {
        ExitCodes::FILE_CONFLICT
    } else if msg.contains("argument") || msg.contains("option") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
