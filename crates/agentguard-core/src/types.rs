//! Core types for the `AgentGuard` policy guard.
//!
//! This module provides the values that flow through every `AgentGuard` crate:
//!
//! - [`TransactionProposal`] - What the agent wants to do
//! - [`FeeEstimate`] - The network fee snapshot used for one evaluation
//! - [`VerdictKind`] - Which rule decided the outcome
//! - [`Verdict`] - The authorize/block decision plus a human-readable reason
//!
//! # Examples
//!
//! ```
//! use agentguard_core::types::{TransactionProposal, Verdict, VerdictKind};
//! use alloy_primitives::U256;
//!
//! let proposal = TransactionProposal::new(
//!     "0x1234567890abcdef1234567890abcdef12345678",
//!     U256::from(500_000_000_000_000_000u64), // 0.5 ETH
//! )
//! .with_description("pay the invoice");
//!
//! assert_eq!(proposal.amount_ether(), "0.5");
//!
//! let verdict = Verdict::blocked(VerdictKind::AmountExceedsLimit, "too much");
//! assert!(!verdict.authorized);
//! assert_eq!(verdict.to_string(), "blocked by tx_limit: too much");
//! ```

use crate::amount::{self, format_ether_amount, format_gwei_amount, WEI_PER_GWEI};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction the agent proposes to execute.
///
/// The destination is kept as the raw string the agent produced. It has not
/// been checked yet and may be hallucinated; the policy engine decides whether
/// it is well-formed.
///
/// # Serialization
///
/// Amounts travel as decimal ether strings:
///
/// ```
/// use agentguard_core::types::TransactionProposal;
/// use alloy_primitives::U256;
///
/// let json = r#"{"destination": "0xScamAddress888", "amount": "10.0"}"#;
/// let proposal: TransactionProposal = serde_json::from_str(json).unwrap();
/// assert_eq!(proposal.amount, U256::from(10_000_000_000_000_000_000u128));
/// assert!(proposal.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProposal {
    /// Raw destination address as proposed.
    pub destination: String,

    /// Transfer amount in wei.
    #[serde(with = "amount::ether")]
    pub amount: U256,

    /// Free-form explanation from the agent. Never affects the verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionProposal {
    /// Creates a proposal without a description.
    #[must_use]
    pub fn new(destination: impl Into<String>, amount: U256) -> Self {
        Self {
            destination: destination.into(),
            amount,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The amount as a decimal ether string.
    #[must_use]
    pub fn amount_ether(&self) -> String {
        format_ether_amount(self.amount)
    }
}

/// Estimated network fee, in wei per unit of gas.
///
/// One estimate is taken per evaluation and passed by value so that every
/// check of that evaluation sees the same number.
///
/// ```
/// use agentguard_core::types::FeeEstimate;
///
/// let fee = FeeEstimate::from_gwei(30);
/// assert_eq!(fee.to_string(), "30 gwei");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FeeEstimate(U256);

impl FeeEstimate {
    /// Wraps a fee in wei per gas.
    #[must_use]
    pub const fn new(wei: U256) -> Self {
        Self(wei)
    }

    /// Builds a fee from whole gwei.
    #[must_use]
    pub fn from_gwei(gwei: u64) -> Self {
        Self(U256::from(gwei).saturating_mul(U256::from(WEI_PER_GWEI)))
    }

    /// The fee in wei per gas.
    #[must_use]
    pub const fn wei(&self) -> U256 {
        self.0
    }

    /// The fee as a decimal gwei string.
    #[must_use]
    pub fn gwei(&self) -> String {
        format_gwei_amount(self.0)
    }
}

impl From<U256> for FeeEstimate {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl fmt::Display for FeeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gwei", self.gwei())
    }
}

/// Which rule produced a verdict.
///
/// Variants are listed in evaluation order. Exactly one kind is authorizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// The destination does not follow the configured address format.
    MalformedAddress,
    /// The amount is above the per-transaction ceiling.
    AmountExceedsLimit,
    /// The current network fee is above the fee ceiling.
    FeeTooHigh,
    /// The destination is unknown and the amount is not small enough to be exempt.
    DestinationNotWhitelisted,
    /// Every check passed.
    Verified,
}

impl VerdictKind {
    /// All kinds, in evaluation order.
    pub const ALL: [Self; 5] = [
        Self::MalformedAddress,
        Self::AmountExceedsLimit,
        Self::FeeTooHigh,
        Self::DestinationNotWhitelisted,
        Self::Verified,
    ];

    /// Stable snake-case name.
    ///
    /// ```
    /// use agentguard_core::types::VerdictKind;
    ///
    /// assert_eq!(VerdictKind::FeeTooHigh.as_str(), "fee_too_high");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedAddress => "malformed_address",
            Self::AmountExceedsLimit => "amount_exceeds_limit",
            Self::FeeTooHigh => "fee_too_high",
            Self::DestinationNotWhitelisted => "destination_not_whitelisted",
            Self::Verified => "verified",
        }
    }

    /// Name of the rule that blocks with this kind, `None` for [`Self::Verified`].
    #[must_use]
    pub const fn rule_name(&self) -> Option<&'static str> {
        match self {
            Self::MalformedAddress => Some("address_format"),
            Self::AmountExceedsLimit => Some("tx_limit"),
            Self::FeeTooHigh => Some("fee_ceiling"),
            Self::DestinationNotWhitelisted => Some("whitelist"),
            Self::Verified => None,
        }
    }

    /// Returns `true` only for [`Self::Verified`].
    #[must_use]
    pub const fn is_authorizing(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The guard's decision for one proposal.
///
/// `authorized` is `true` exactly when `kind` is [`VerdictKind::Verified`]; the
/// constructors are the only way to build one outside this crate's tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the proposal may be executed.
    pub authorized: bool,

    /// The rule that decided.
    pub kind: VerdictKind,

    /// Human-readable explanation.
    pub reason: String,
}

impl Verdict {
    /// An authorizing verdict.
    #[must_use]
    pub fn verified() -> Self {
        Self {
            authorized: true,
            kind: VerdictKind::Verified,
            reason: "all policy checks passed".to_string(),
        }
    }

    /// A blocking verdict.
    ///
    /// Passing [`VerdictKind::Verified`] yields an authorizing verdict with the
    /// given reason, so `authorized` always agrees with `kind`.
    #[must_use]
    pub fn blocked(kind: VerdictKind, reason: impl Into<String>) -> Self {
        Self {
            authorized: kind.is_authorizing(),
            kind,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the proposal was blocked.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        !self.authorized
    }

    /// The blocking rule name, if blocked.
    #[must_use]
    pub const fn rule_name(&self) -> Option<&'static str> {
        self.kind.rule_name()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.rule_name() {
            None => write!(f, "authorized: {}", self.reason),
            Some(rule) => write!(f, "blocked by {rule}: {}", self.reason),
        }
    }
}
