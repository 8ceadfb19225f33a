//! The driving loop between an agent and an execution channel.
//!
//! A [`Guard`] pulls proposals from a [`ProposalSource`], takes exactly one fee
//! estimate per proposal, asks the policy engine for a verdict, logs it, and
//! hands the proposal to an [`ExecutionSink`] only when it was authorized.
//!
//! # Flow Overview
//!
//! 1. **Estimate** - one [`FeeEstimate`] from the [`FeeEstimator`]
//! 2. **Evaluate** - [`PolicyEngine::evaluate`] with that snapshot
//! 3. **Log** - [`log_verdict_event`]
//! 4. **Execute** - only if the verdict authorizes it
//!
//! A failed estimate yields no verdict at all; the proposal is skipped rather
//! than judged against a guessed fee. An input record that cannot be decoded
//! is skipped the same way by [`Guard::run`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use agentguard_core::error::{FeeError, ParseError};
use agentguard_core::types::{FeeEstimate, TransactionProposal, Verdict, VerdictKind};
use agentguard_policy::{FeeEstimator, PolicyEngine};
use serde::Serialize;

use crate::logging::{log_verdict_event, new_correlation_id};

/// Default time allowed for one fee estimate.
pub const DEFAULT_FEE_TIMEOUT: Duration = Duration::from_millis(2000);

// ============================================================================
// Errors
// ============================================================================

/// A proposal source could not produce the next proposal.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading the underlying input failed.
    #[error("failed to read proposals: {0}")]
    Io(#[from] std::io::Error),

    /// One input record could not be decoded.
    #[error("record {record}: {source}")]
    Malformed {
        /// 1-based record number within the input.
        record: usize,
        /// What was wrong with it.
        #[source]
        source: ParseError,
    },
}

/// The execution channel refused or failed to execute an authorized proposal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The channel rejected the proposal.
    #[error("execution rejected: {0}")]
    Rejected(String),

    /// The channel is not reachable.
    #[error("execution channel unavailable: {0}")]
    Unavailable(String),
}

/// Errors that stop the guard from finishing a proposal or a run.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// No fee estimate, so no verdict.
    #[error("no verdict for proposal to {destination}: {source}")]
    Fee {
        /// Destination of the proposal that was skipped.
        destination: String,
        /// The estimator's failure.
        #[source]
        source: FeeError,
    },

    /// The proposal source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// An authorized proposal could not be executed.
    #[error("execution of proposal to {destination} failed: {source}")]
    Execution {
        /// Destination of the authorized proposal.
        destination: String,
        /// The sink's failure.
        #[source]
        source: ExecutionError,
    },
}

// ============================================================================
// Collaborators
// ============================================================================

/// Where proposals come from.
pub trait ProposalSource {
    /// Returns the next proposal, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the next proposal cannot be read.
    fn next_proposal(&mut self) -> Result<Option<TransactionProposal>, SourceError>;
}

/// Confirmation from an execution channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReceipt {
    /// Channel-specific reference for the executed proposal.
    pub reference: String,
    /// `true` if nothing was actually broadcast.
    pub dry_run: bool,
}

/// The irreversible side of the guard.
pub trait ExecutionSink {
    /// Executes an authorized proposal.
    ///
    /// The guard never calls this for a blocked verdict.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] if the channel does not accept the proposal.
    fn execute(
        &mut self,
        proposal: &TransactionProposal,
        verdict: &Verdict,
    ) -> Result<ExecutionReceipt, ExecutionError>;
}

impl<T: ProposalSource + ?Sized> ProposalSource for &mut T {
    fn next_proposal(&mut self) -> Result<Option<TransactionProposal>, SourceError> {
        (**self).next_proposal()
    }
}

impl<T: ExecutionSink + ?Sized> ExecutionSink for &mut T {
    fn execute(
        &mut self,
        proposal: &TransactionProposal,
        verdict: &Verdict,
    ) -> Result<ExecutionReceipt, ExecutionError> {
        (**self).execute(proposal, verdict)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// What happened to one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    /// The verdict.
    pub verdict: Verdict,
    /// The fee snapshot the verdict was computed with, in wei per gas.
    #[serde(serialize_with = "serialize_fee")]
    pub fee: FeeEstimate,
    /// Present only when the proposal was authorized and executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ExecutionReceipt>,
}

fn serialize_fee<S: serde::Serializer>(fee: &FeeEstimate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&fee.gwei())
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Proposals that received a verdict.
    pub evaluated: usize,
    /// Verdicts that authorized execution.
    pub authorized: usize,
    /// Verdicts that blocked execution.
    pub blocked: usize,
    /// Proposals skipped without a verdict: no fee estimate, or an
    /// undecodable input record.
    pub skipped: usize,
    /// Verdict counts per kind.
    pub by_kind: BTreeMap<VerdictKind, usize>,
}

impl RunSummary {
    /// Counts one verdict.
    pub fn record(&mut self, verdict: &Verdict) {
        self.evaluated += 1;
        if verdict.authorized {
            self.authorized += 1;
        } else {
            self.blocked += 1;
        }
        *self.by_kind.entry(verdict.kind).or_insert(0) += 1;
    }

    /// Counts one proposal that never got a verdict.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Number of verdicts of `kind`.
    #[must_use]
    pub fn count(&self, kind: VerdictKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "evaluated {} proposal(s): {} authorized, {} blocked, {} skipped",
            self.evaluated, self.authorized, self.blocked, self.skipped
        )?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {kind:<28} {count}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Guard
// ============================================================================

/// Sits between a proposal source and an execution sink.
///
/// # Example
///
/// ```
/// use agentguard::guard::Guard;
/// use agentguard::sinks::RecordingSink;
/// use agentguard_core::{FeeEstimate, PolicyConfig, TransactionProposal, U256};
/// use agentguard_policy::{DefaultPolicyEngine, FixedFeeEstimator};
///
/// let engine = DefaultPolicyEngine::new(PolicyConfig::default()).unwrap();
/// let guard = Guard::new(engine, FixedFeeEstimator::new(FeeEstimate::from_gwei(30)));
/// let mut sink = RecordingSink::new();
///
/// let outcome = guard
///     .process(&TransactionProposal::new("0xScamAddress888", U256::from(1u64)), &mut sink)
///     .unwrap();
/// assert!(!outcome.verdict.authorized);
/// assert!(sink.executed().is_empty());
/// ```
pub struct Guard<P, F> {
    policy: P,
    fees: F,
    fee_timeout: Duration,
}

impl<P, F> fmt::Debug for Guard<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("policy", &"<PolicyEngine>")
            .field("fees", &"<FeeEstimator>")
            .field("fee_timeout", &self.fee_timeout)
            .finish()
    }
}

impl<P, F> Guard<P, F> {
    /// Creates a guard with the default fee timeout.
    #[must_use]
    pub const fn new(policy: P, fees: F) -> Self {
        Self {
            policy,
            fees,
            fee_timeout: DEFAULT_FEE_TIMEOUT,
        }
    }

    /// Sets the time allowed for each fee estimate.
    #[must_use]
    pub const fn with_fee_timeout(mut self, timeout: Duration) -> Self {
        self.fee_timeout = timeout;
        self
    }

    /// The policy engine.
    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// The fee estimator.
    #[must_use]
    pub const fn fees(&self) -> &F {
        &self.fees
    }

    /// The fee timeout.
    #[must_use]
    pub const fn fee_timeout(&self) -> Duration {
        self.fee_timeout
    }
}

impl<P, F> Guard<P, F>
where
    P: PolicyEngine,
    F: FeeEstimator,
{
    /// Judges one proposal and executes it if authorized.
    ///
    /// A blocked verdict is a successful outcome, not an error.
    ///
    /// # Errors
    ///
    /// - [`GuardError::Fee`] if no fee estimate could be obtained; nothing was
    ///   evaluated or executed
    /// - [`GuardError::Execution`] if the sink failed on an authorized proposal
    pub fn process<S>(
        &self,
        proposal: &TransactionProposal,
        sink: &mut S,
    ) -> Result<ProcessOutcome, GuardError>
    where
        S: ExecutionSink + ?Sized,
    {
        let span = crate::with_correlation_id!(
            new_correlation_id(),
            "process_proposal",
            destination = %proposal.destination
        );
        let _entered = span.enter();

        let fee = self.fees.estimate(self.fee_timeout).map_err(|source| {
            tracing::warn!(error = %source, "no fee estimate, proposal skipped");
            GuardError::Fee {
                destination: proposal.destination.clone(),
                source,
            }
        })?;

        let verdict = self.policy.evaluate(proposal, fee);
        log_verdict_event(proposal, fee, &verdict);

        if !verdict.authorized {
            return Ok(ProcessOutcome {
                verdict,
                fee,
                receipt: None,
            });
        }

        let receipt = sink
            .execute(proposal, &verdict)
            .map_err(|source| GuardError::Execution {
                destination: proposal.destination.clone(),
                source,
            })?;
        tracing::debug!(reference = %receipt.reference, dry_run = receipt.dry_run, "executed");

        Ok(ProcessOutcome {
            verdict,
            fee,
            receipt: Some(receipt),
        })
    }

    /// Processes proposals until the source is exhausted or `limit` proposals
    /// have been pulled.
    ///
    /// Malformed records and proposals without a fee estimate are counted as
    /// skipped and the run continues. Both count toward `limit`.
    ///
    /// # Errors
    ///
    /// - [`GuardError::Source`] if reading the source fails
    /// - [`GuardError::Execution`] if the sink fails on an authorized proposal
    pub fn run<Src, S>(
        &self,
        source: &mut Src,
        sink: &mut S,
        limit: Option<usize>,
    ) -> Result<RunSummary, GuardError>
    where
        Src: ProposalSource + ?Sized,
        S: ExecutionSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        let mut pulled = 0usize;

        while limit.map_or(true, |max| pulled < max) {
            let proposal = match source.next_proposal() {
                Ok(Some(proposal)) => proposal,
                Ok(None) => break,
                Err(SourceError::Malformed { record, source: error }) => {
                    pulled += 1;
                    tracing::warn!(record, error = %error, "malformed proposal skipped");
                    summary.record_skipped();
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            pulled += 1;

            match self.process(&proposal, sink) {
                Ok(outcome) => summary.record(&outcome.verdict),
                Err(GuardError::Fee { .. }) => summary.record_skipped(),
                Err(other) => return Err(other),
            }
        }

        tracing::info!(
            evaluated = summary.evaluated,
            authorized = summary.authorized,
            blocked = summary.blocked,
            skipped = summary.skipped,
            "run finished"
        );
        Ok(summary)
    }
}
