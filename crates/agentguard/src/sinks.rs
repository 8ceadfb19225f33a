//! Built-in execution sinks.
//!
//! Nothing here broadcasts a transaction. [`DryRunSink`] stands in for a real
//! execution channel and [`RecordingSink`] keeps what it was given for tests.

use agentguard_core::types::{TransactionProposal, Verdict};

use crate::guard::{ExecutionError, ExecutionReceipt, ExecutionSink};

/// Logs authorized proposals and pretends to execute them.
#[derive(Debug, Default)]
pub struct DryRunSink {
    executed: usize,
}

impl DryRunSink {
    /// Creates a sink with no executions.
    #[must_use]
    pub const fn new() -> Self {
        Self { executed: 0 }
    }

    /// How many proposals were "executed".
    #[must_use]
    pub const fn executed(&self) -> usize {
        self.executed
    }
}

impl ExecutionSink for DryRunSink {
    fn execute(
        &mut self,
        proposal: &TransactionProposal,
        _verdict: &Verdict,
    ) -> Result<ExecutionReceipt, ExecutionError> {
        self.executed += 1;
        tracing::info!(
            destination = %proposal.destination,
            amount_eth = %proposal.amount_ether(),
            "dry run: transfer not broadcast"
        );
        Ok(ExecutionReceipt {
            reference: format!("dry-run-{}", self.executed),
            dry_run: true,
        })
    }
}

/// Collects every proposal it is asked to execute.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    executed: Vec<TransactionProposal>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            executed: Vec::new(),
        }
    }

    /// Proposals executed so far, in order.
    #[must_use]
    pub fn executed(&self) -> &[TransactionProposal] {
        &self.executed
    }

    /// Takes the recorded proposals, leaving the sink empty.
    pub fn take(&mut self) -> Vec<TransactionProposal> {
        std::mem::take(&mut self.executed)
    }
}

impl ExecutionSink for RecordingSink {
    fn execute(
        &mut self,
        proposal: &TransactionProposal,
        verdict: &Verdict,
    ) -> Result<ExecutionReceipt, ExecutionError> {
        if !verdict.authorized {
            return Err(ExecutionError::Rejected(format!(
                "refusing blocked proposal: {verdict}"
            )));
        }
        self.executed.push(proposal.clone());
        Ok(ExecutionReceipt {
            reference: format!("recorded-{}", self.executed.len()),
            dry_run: true,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use agentguard_core::types::VerdictKind;
    use alloy_primitives::U256;

    fn proposal() -> TransactionProposal {
        TransactionProposal::new("0x1234567890abcdef1234567890abcdef12345678", U256::from(7u64))
    }

    #[test]
    fn test_dry_run_numbers_receipts() {
        let mut sink = DryRunSink::new();
        let first = sink.execute(&proposal(), &Verdict::verified()).unwrap();
        let second = sink.execute(&proposal(), &Verdict::verified()).unwrap();

        assert_eq!(first.reference, "dry-run-1");
        assert_eq!(second.reference, "dry-run-2");
        assert!(second.dry_run);
        assert_eq!(sink.executed(), 2);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        let a = proposal();
        let b = proposal().with_description("second");

        sink.execute(&a, &Verdict::verified()).unwrap();
        sink.execute(&b, &Verdict::verified()).unwrap();

        assert_eq!(sink.executed(), &[a, b]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.executed().is_empty());
    }

    #[test]
    fn test_recording_sink_rejects_blocked_verdict() {
        let mut sink = RecordingSink::new();
        let verdict = Verdict::blocked(VerdictKind::FeeTooHigh, "too expensive");

        let err = sink.execute(&proposal(), &verdict).unwrap_err();
        assert!(matches!(err, ExecutionError::Rejected(_)));
        assert!(sink.executed().is_empty());
    }
}
