//! # Check Command
//!
//! `agentguard check` judges a single proposal and reports the verdict.
//!
//! ## Output Formats
//!
//! ### Text (default)
//!
//! ```text
//! blocked by address_format: malformed destination: invalid address "0xScamAddress888": expected 42 characters, got 16
//! ```
//!
//! ### JSON
//!
//! ```json
//! {
//!   "destination": "0xScamAddress888",
//!   "amount_eth": "10",
//!   "fee_gwei": "30",
//!   "verdict": { "authorized": false, "kind": "malformed_address", "reason": "..." }
//! }
//! ```
//!
//! ## Exit Codes
//!
//! - 0: Authorized
//! - 1: Blocked
//! - 2: Other error

use std::path::PathBuf;

use agentguard_core::amount::parse_ether_amount;
use agentguard_core::error::{ConfigError, ParseError, PolicyError};
use agentguard_core::types::{TransactionProposal, Verdict};
use agentguard_policy::PolicyEngine;
use serde::Serialize;

use super::exit_codes::{EXIT_BLOCKED, EXIT_ERROR};
use super::{build_engine, load_effective_config, resolve_fee};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::logging::log_verdict_event;

/// Errors that can occur when checking a proposal.
#[derive(Debug, thiserror::Error)]
pub enum CheckCommandError {
    /// The policy blocked the proposal.
    #[error("Blocked by {rule}: {reason}")]
    Blocked {
        /// The rule that blocked.
        rule: String,
        /// The reason given.
        reason: String,
    },

    /// `--amount` or `--fee-gwei` could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ParseError),

    /// No fee from the command line or the configuration.
    #[error("No fee estimate: set fee.estimate_gwei or pass --fee-gwei")]
    NoFeeEstimate,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Policy engine error.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Failed to render the report.
    #[error("Failed to format output: {0}")]
    Output(String),
}

impl CheckCommandError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Blocked { .. } => EXIT_BLOCKED,
            _ => EXIT_ERROR,
        }
    }
}

/// The result of one check, as printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Destination as given.
    pub destination: String,
    /// Amount in ETH.
    pub amount_eth: String,
    /// Fee in gwei used for the evaluation.
    pub fee_gwei: String,
    /// The verdict.
    pub verdict: Verdict,
}

/// The `agentguard check` command handler.
#[derive(Debug, Clone)]
pub struct CheckCommand {
    /// Parsed arguments.
    pub args: CheckArgs,
    /// Explicit configuration path.
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    /// Create a new `CheckCommand`.
    #[must_use]
    pub const fn new(args: CheckArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }

    /// Evaluate the proposal and print the report.
    ///
    /// # Errors
    ///
    /// Returns [`CheckCommandError::Blocked`] after printing the report if the
    /// policy blocked the proposal, and other variants for input or
    /// configuration problems.
    pub fn run(&self) -> Result<(), CheckCommandError> {
        let report = self.evaluate()?;

        match self.args.format {
            OutputFormat::Text => println!("{}", report.verdict),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| CheckCommandError::Output(e.to_string()))?;
                println!("{json}");
            }
        }

        if report.verdict.authorized {
            Ok(())
        } else {
            Err(CheckCommandError::Blocked {
                rule: report.verdict.rule_name().unwrap_or("unknown").to_string(),
                reason: report.verdict.reason,
            })
        }
    }

    /// Evaluate the proposal without printing anything.
    ///
    /// A blocked verdict is returned in the report, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable input, a missing fee, or an invalid
    /// configuration.
    pub fn evaluate(&self) -> Result<CheckReport, CheckCommandError> {
        let amount = parse_ether_amount(&self.args.amount)?;
        let config = load_effective_config(self.config.as_deref())?;
        let fee = resolve_fee(self.args.fee_gwei.as_deref(), &config.fee)?
            .ok_or(CheckCommandError::NoFeeEstimate)?;
        let engine = build_engine(config.policy)?;

        let proposal = TransactionProposal::new(self.args.destination.clone(), amount);
        let verdict = engine.evaluate(&proposal, fee);
        log_verdict_event(&proposal, fee, &verdict);

        Ok(CheckReport {
            destination: proposal.destination.clone(),
            amount_eth: proposal.amount_ether(),
            fee_gwei: fee.gwei(),
            verdict,
        })
    }
}
