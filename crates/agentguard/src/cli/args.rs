//! # CLI Argument Definitions
//!
//! clap derive definitions for the `agentguard` binary.
//!
//! - `agentguard init [--force]` - Write the default configuration
//! - `agentguard config [show|path]` - Show the effective configuration or its path
//! - `agentguard check --to <ADDR> --amount <ETH>` - Judge one proposal
//! - `agentguard run [--input <FILE>]` - Judge newline-delimited JSON proposals
//! - `agentguard demo [--rounds N]` - Replay the built-in scenarios
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `-c, --config <PATH>` - Path to configuration file
//! - `--log-format <FORMAT>` - pretty, json or compact
//! - `--log-file <PATH>` - Mirror logs into a daily-rotated file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

/// Deterministic guard between an autonomous agent and transaction execution.
#[derive(Debug, Parser)]
#[command(name = "agentguard")]
#[command(author, version, about = "Deterministic policy guard for agent-proposed transfers")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    ///
    /// Verdicts are logged at info (authorized) and warn (blocked).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    ///
    /// Defaults to `~/.agentguard/config.toml`. A missing default file means
    /// built-in defaults; a missing explicit file is an error.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value_t = LogFormat::Pretty, value_name = "FORMAT")]
    pub log_format: LogFormat,

    /// Also write logs to this file, rotated daily
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a commented default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    ///
    /// Without a subcommand, behaves like `config show`.
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Evaluate a single proposal
    ///
    /// Exits 0 when authorized, 1 when blocked and 2 on error.
    Check(CheckArgs),

    /// Evaluate proposals read as newline-delimited JSON
    ///
    /// Each line is an object such as
    /// `{"destination": "0x...", "amount": "0.5", "description": "rent"}`.
    /// Authorized proposals go to a dry-run sink; nothing is broadcast.
    Run(RunArgs),

    /// Replay the built-in agent scenarios through the guard
    Demo(DemoArgs),
}

/// Configuration-related actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,
}

/// Arguments for `agentguard check`.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Destination address
    #[arg(long = "to", value_name = "ADDR")]
    pub destination: String,

    /// Amount in ETH, for example `0.5`
    #[arg(long, value_name = "ETH")]
    pub amount: String,

    /// Network fee in gwei, overriding `fee.estimate_gwei`
    #[arg(long, value_name = "GWEI")]
    pub fee_gwei: Option<String>,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Text, value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Arguments for `agentguard run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Input file, or `-` for stdin
    #[arg(short, long, default_value = "-", value_name = "FILE")]
    pub input: PathBuf,

    /// Network fee in gwei, overriding `fee.estimate_gwei`
    #[arg(long, value_name = "GWEI")]
    pub fee_gwei: Option<String>,

    /// Stop after this many proposals
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format for the summary
    #[arg(short, long, default_value_t = OutputFormat::Text, value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Arguments for `agentguard demo`.
#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    /// Number of rounds, overriding `agent.rounds`
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,

    /// JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
