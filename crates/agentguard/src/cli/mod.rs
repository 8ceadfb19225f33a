//! # CLI Module
//!
//! Command-line interface for `AgentGuard`.
//!
//! ## Module Structure
//!
//! - [`args`] - Argument parsing and CLI structure definitions
//! - [`commands`] - Command handler implementations
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use agentguard::cli::{Cli, Commands};
//!
//! let cli = Cli::parse();
//!
//! match cli.command {
//!     Commands::Check(args) => {
//!         // Judge one proposal
//!     }
//!     Commands::Demo(args) => {
//!         // Replay the built-in scenarios
//!     }
//!     _ => {}
//! }
//! ```
//!
//! ## Commands
//!
//! - `agentguard init [--force]` - Write the default configuration
//! - `agentguard config [show|path]` - Show the effective configuration or its path
//! - `agentguard check --to <ADDR> --amount <ETH> [--fee-gwei <GWEI>] [--format text|json]`
//! - `agentguard run [--input <FILE>|-] [--fee-gwei <GWEI>] [--limit N] [--format text|json]`
//! - `agentguard demo [--rounds N]`

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, ConfigAction, DemoArgs, OutputFormat, RunArgs};
