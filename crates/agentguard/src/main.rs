//! # `AgentGuard`
//!
//! Deterministic policy guard for agent-proposed transfers.
//!
//! ## Usage
//!
//! ```bash
//! # Write the default configuration
//! agentguard init
//!
//! # Judge one proposal
//! agentguard check --to 0x1234567890abcdef1234567890abcdef12345678 --amount 0.5
//!
//! # Judge a stream of proposals
//! agentguard run --input proposals.jsonl
//!
//! # Watch the guard stop a hallucinating agent
//! agentguard demo --rounds 5
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use agentguard::cli::commands::exit_codes::{EXIT_BLOCKED, EXIT_ERROR};
use agentguard::cli::commands::{
    CheckCommand, CheckCommandError, ConfigCommand, DemoCommand, InitCommand, RunCommand,
};
use agentguard::cli::{Cli, Commands};
use agentguard::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogGuard};
use clap::Parser;

/// Set up logging from the global CLI options.
///
/// # Errors
///
/// Returns [`LogError`] if logging initialization fails.
fn setup_logging(cli: &Cli) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(cli.verbose),
        format: cli.log_format,
        file_path: cli.log_file.clone(),
        correlation_ids: true,
    };
    init_logging(&config)
}

/// Main entry point for the `AgentGuard` application.
fn main() {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let config = cli.config;
    let result = match cli.command {
        Commands::Init { force } => {
            let cmd = InitCommand::new(force, config);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Config { action } => {
            let cmd = ConfigCommand::new(action, config);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Check(args) => {
            let cmd = CheckCommand::new(args, config);
            match cmd.run() {
                Ok(()) => Ok(()),
                Err(CheckCommandError::Blocked { rule, reason }) => {
                    eprintln!("Blocked: {rule} - {reason}");
                    std::process::exit(EXIT_BLOCKED);
                }
                Err(e) => Err(e.to_string()),
            }
        }
        Commands::Run(args) => {
            let cmd = RunCommand::new(args, config);
            cmd.run().map_err(|e| e.to_string())
        }
        Commands::Demo(args) => {
            let cmd = DemoCommand::new(args.rounds, config);
            cmd.run().map_err(|e| e.to_string())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(EXIT_ERROR);
    }
}
