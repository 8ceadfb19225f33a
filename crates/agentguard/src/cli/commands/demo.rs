//! # Demo Command
//!
//! `agentguard demo` plays an agent that keeps proposing transfers, some
//! sensible and some hallucinated, and shows the guard's decision for each.
//!
//! ```text
//! --- Round 2 ---
//! agent proposes: send 0.5 ETH to 0xScammerAddress123 (hallucinated destination)
//! fee estimate: 42 gwei
//! BLOCKED: blocked by address_format: malformed destination: ...
//! ```
//!
//! Proposals cycle through [`builtin_scenarios`](crate::sources::builtin_scenarios)
//! and fees through [`DEMO_FEES_GWEI`]. If the configured whitelist is empty
//! the demo trusts [`DEMO_WHITELIST`].

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use agentguard_core::error::{ConfigError, PolicyError};
use agentguard_policy::ScriptedFeeEstimator;

use super::{build_engine, load_effective_config};
use crate::guard::{Guard, GuardError, ProposalSource, RunSummary};
use crate::sinks::DryRunSink;
use crate::sources::{ScenarioSource, DEMO_WHITELIST};

/// Fees the demo's estimator cycles through, in gwei.
///
/// With the default 50 gwei ceiling the fifth round is the first blocked on
/// fee.
pub const DEMO_FEES_GWEI: [u64; 5] = [30, 42, 18, 35, 75];

/// Errors that can occur during `agentguard demo`.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Policy engine error.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A round could not be completed.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Writing the transcript failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// The `agentguard demo` command handler.
#[derive(Debug, Clone)]
pub struct DemoCommand {
    /// Rounds to play; `None` uses `agent.rounds`.
    pub rounds: Option<u32>,
    /// Explicit configuration path.
    pub config: Option<PathBuf>,
}

impl DemoCommand {
    /// Create a new `DemoCommand`.
    #[must_use]
    pub const fn new(rounds: Option<u32>, config: Option<PathBuf>) -> Self {
        Self { rounds, config }
    }

    /// Play the demo on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable or stdout is closed.
    pub fn run(&self) -> Result<(), DemoError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.play(&mut out)?;
        Ok(())
    }

    /// Play the demo, writing the transcript to `out`.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn play<W: Write>(&self, out: &mut W) -> Result<RunSummary, DemoError> {
        let config = load_effective_config(self.config.as_deref())?;
        let rounds = self.rounds.unwrap_or(config.agent.rounds);

        let mut policy = config.policy;
        if policy.whitelist.is_empty() {
            tracing::debug!("empty whitelist, using the demo addresses");
            policy = policy.with_whitelist(DEMO_WHITELIST.iter().map(ToString::to_string).collect());
        }

        let guard = Guard::new(build_engine(policy)?, ScriptedFeeEstimator::from_gwei(&DEMO_FEES_GWEI))
            .with_fee_timeout(Duration::from_millis(config.fee.timeout_ms));
        let mut source =
            ScenarioSource::builtin().with_limit(usize::try_from(rounds).unwrap_or(usize::MAX));
        let mut sink = DryRunSink::new();
        let mut summary = RunSummary::default();

        tracing::info!(rounds, owner = ?config.agent.owner, "demo started");
        writeln!(out, "=== Autonomous agent behind AgentGuard ({rounds} rounds) ===")?;

        let mut round = 0u32;
        while let Some(proposal) = source.next_proposal().map_err(GuardError::from)? {
            round += 1;
            writeln!(out)?;
            writeln!(out, "--- Round {round} ---")?;
            write!(
                out,
                "agent proposes: send {} ETH to {}",
                proposal.amount_ether(),
                proposal.destination
            )?;
            match &proposal.description {
                Some(description) => writeln!(out, " ({description})")?,
                None => writeln!(out)?,
            }

            match guard.process(&proposal, &mut sink) {
                Ok(outcome) => {
                    writeln!(out, "fee estimate: {} gwei", outcome.fee.gwei())?;
                    match &outcome.receipt {
                        Some(receipt) => {
                            writeln!(out, "EXECUTED ({}): {}", receipt.reference, outcome.verdict)?;
                        }
                        None => writeln!(out, "BLOCKED: {}", outcome.verdict)?,
                    }
                    summary.record(&outcome.verdict);
                }
                Err(GuardError::Fee { source, .. }) => {
                    writeln!(out, "SKIPPED: {source}")?;
                    summary.record_skipped();
                }
                Err(other) => return Err(other.into()),
            }
        }

        writeln!(out)?;
        write!(out, "{summary}")?;
        Ok(summary)
    }
}
