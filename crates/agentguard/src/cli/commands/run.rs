//! # Run Command
//!
//! `agentguard run` reads newline-delimited JSON proposals and pushes each one
//! through the [`Guard`] with a [`DryRunSink`]. Nothing is broadcast.
//!
//! ```text
//! $ agentguard run --input proposals.jsonl
//! evaluated 4 proposal(s): 1 authorized, 3 blocked, 0 skipped
//!   verified                     1
//!   malformed_address            1
//!   ...
//! ```
//!
//! Every verdict is also logged on stderr at info (authorized) or warn
//! (blocked), so stdout carries only the summary.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use agentguard_core::error::{ConfigError, ParseError, PolicyError};
use agentguard_policy::FixedFeeEstimator;

use super::{build_engine, load_effective_config, resolve_fee};
use crate::cli::args::{OutputFormat, RunArgs};
use crate::guard::{Guard, GuardError, RunSummary};
use crate::sinks::DryRunSink;
use crate::sources::JsonLinesSource;

/// Errors that can occur during `agentguard run`.
#[derive(Debug, thiserror::Error)]
pub enum RunCommandError {
    /// `--fee-gwei` could not be parsed.
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

    /// The input file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// The input path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The run stopped early.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Failed to render the summary.
    #[error("Failed to format output: {0}")]
    Output(String),
}

/// The `agentguard run` command handler.
#[derive(Debug, Clone)]
pub struct RunCommand {
    /// Parsed arguments.
    pub args: RunArgs,
    /// Explicit configuration path.
    pub config: Option<PathBuf>,
}

impl RunCommand {
    /// Create a new `RunCommand`.
    #[must_use]
    pub const fn new(args: RunArgs, config: Option<PathBuf>) -> Self {
        Self { args, config }
    }

    /// Read proposals from `--input` (or stdin) and print the summary.
    ///
    /// Blocked verdicts do not make the command fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or read, or if the
    /// configuration or fee is unusable. Malformed records are skipped.
    pub fn run(&self) -> Result<(), RunCommandError> {
        let summary = if is_stdin(&self.args.input) {
            self.run_with_reader(io::stdin().lock())?
        } else {
            let file = File::open(&self.args.input).map_err(|source| RunCommandError::Open {
                path: self.args.input.clone(),
                source,
            })?;
            self.run_with_reader(BufReader::new(file))?
        };

        match self.args.format {
            OutputFormat::Text => print!("{summary}"),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&summary)
                    .map_err(|e| RunCommandError::Output(e.to_string()))?;
                println!("{json}");
            }
        }
        Ok(())
    }

    /// Run the guard over proposals read from `reader`.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), minus opening the input.
    pub fn run_with_reader<R: BufRead>(&self, reader: R) -> Result<RunSummary, RunCommandError> {
        let config = load_effective_config(self.config.as_deref())?;
        let fee = resolve_fee(self.args.fee_gwei.as_deref(), &config.fee)?
            .ok_or(RunCommandError::NoFeeEstimate)?;
        let engine = build_engine(config.policy)?;

        let guard = Guard::new(engine, FixedFeeEstimator::new(fee))
            .with_fee_timeout(Duration::from_millis(config.fee.timeout_ms));
        let mut source = JsonLinesSource::new(reader);
        let mut sink = DryRunSink::new();

        tracing::info!(fee_gwei = %fee.gwei(), limit = ?self.args.limit, "run started");
        let summary = guard.run(&mut source, &mut sink, self.args.limit)?;
        tracing::debug!(lines = source.lines_read(), dry_runs = sink.executed(), "input consumed");
        Ok(summary)
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
