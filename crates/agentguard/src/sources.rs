//! Built-in proposal sources.
//!
//! - [`ScenarioSource`] replays a fixed list of proposals
//! - [`JsonLinesSource`] reads one JSON proposal per line
//! - [`builtin_scenarios`] are the demo fixtures

use std::io::BufRead;

use agentguard_core::amount::WEI_PER_ETHER;
use agentguard_core::error::ParseError;
use agentguard_core::types::TransactionProposal;
use alloy_primitives::U256;

use crate::guard::{ProposalSource, SourceError};

/// Destinations the demo scenarios treat as trusted.
pub const DEMO_WHITELIST: [&str; 2] = [
    "0x1234567890abcdef1234567890abcdef12345678",
    "0xabcdef1234567890abcdef1234567890abcdef12",
];

fn tenths_of_eth(tenths: u64) -> U256 {
    U256::from(tenths) * U256::from(WEI_PER_ETHER / 10)
}

/// The four demo proposals, in a fixed order.
///
/// Against [`DEMO_WHITELIST`] and a 1 ETH ceiling they yield, in order:
/// verified, malformed address, destination not whitelisted, amount over limit.
#[must_use]
pub fn builtin_scenarios() -> Vec<TransactionProposal> {
    vec![
        TransactionProposal::new(DEMO_WHITELIST[0], tenths_of_eth(5))
            .with_description("safe transfer to a known address"),
        TransactionProposal::new("0xScammerAddress123", tenths_of_eth(5))
            .with_description("hallucinated destination"),
        TransactionProposal::new("0x9999999999abcdef1234567890abcdef12345678", tenths_of_eth(2))
            .with_description("unknown destination"),
        TransactionProposal::new(DEMO_WHITELIST[1], tenths_of_eth(50))
            .with_description("limit breach"),
    ]
}

// ============================================================================
// ScenarioSource
// ============================================================================

/// Replays a fixed list of proposals in round-robin order.
///
/// By default the list is played once. [`cycle`](Self::cycle) makes it
/// endless and [`with_limit`](Self::with_limit) stops after a fixed number of
/// proposals, wrapping around as needed.
///
/// ```
/// use agentguard::guard::ProposalSource;
/// use agentguard::sources::{builtin_scenarios, ScenarioSource};
///
/// let mut source = ScenarioSource::new(builtin_scenarios()).with_limit(6);
/// let mut seen = 0;
/// while source.next_proposal().unwrap().is_some() {
///     seen += 1;
/// }
/// assert_eq!(seen, 6);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioSource {
    scenarios: Vec<TransactionProposal>,
    cursor: usize,
    remaining: Option<usize>,
}

impl ScenarioSource {
    /// Plays `scenarios` once, in order.
    #[must_use]
    pub fn new(scenarios: impl IntoIterator<Item = TransactionProposal>) -> Self {
        let scenarios: Vec<_> = scenarios.into_iter().collect();
        let remaining = Some(scenarios.len());
        Self {
            scenarios,
            cursor: 0,
            remaining,
        }
    }

    /// The built-in demo scenarios, played once.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_scenarios())
    }

    /// Never runs out (unless the list is empty).
    #[must_use]
    pub const fn cycle(mut self) -> Self {
        self.remaining = None;
        self
    }

    /// Stops after `limit` proposals.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.remaining = Some(limit);
        self
    }

    /// Proposals left before exhaustion, `None` if endless.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        if self.scenarios.is_empty() {
            return Some(0);
        }
        self.remaining
    }
}

impl ProposalSource for ScenarioSource {
    fn next_proposal(&mut self) -> Result<Option<TransactionProposal>, SourceError> {
        if self.remaining == Some(0) || self.scenarios.is_empty() {
            return Ok(None);
        }

        let index = self.cursor % self.scenarios.len();
        let Some(proposal) = self.scenarios.get(index).cloned() else {
            return Ok(None);
        };

        self.cursor = index + 1;
        if let Some(left) = self.remaining.as_mut() {
            *left -= 1;
        }
        Ok(Some(proposal))
    }
}

// ============================================================================
// JsonLinesSource
// ============================================================================

/// Reads proposals from newline-delimited JSON.
///
/// Each non-blank line must be one proposal object, for example
/// `{"destination": "0x...", "amount": "0.5"}`. Blank lines are skipped. A
/// line that fails to decode yields [`SourceError::Malformed`]; the next call
/// resumes after it.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far, including blank ones.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> ProposalSource for JsonLinesSource<R> {
    fn next_proposal(&mut self) -> Result<Option<TransactionProposal>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            return serde_json::from_str(text)
                .map(Some)
                .map_err(|e| SourceError::Malformed {
                    record: self.line,
                    source: ParseError::invalid_proposal(e.to_string()),
                });
        }
    }
}
