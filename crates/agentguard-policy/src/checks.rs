//! The individual policy checks.
//!
//! Each check inspects one aspect of a proposal and either blocks it with a
//! [`Verdict`] or passes it on by returning `None`. Checks never perform I/O and
//! never look at anything besides the [`CheckContext`] and their own
//! configuration, so running the same check twice gives the same answer.
//!
//! The built-in checks, in the order [`DefaultPolicyEngine`] runs them:
//!
//! | Check | Blocks with |
//! |---|---|
//! | [`AddressFormatCheck`] | [`VerdictKind::MalformedAddress`] |
//! | [`TransactionLimitCheck`] | [`VerdictKind::AmountExceedsLimit`] |
//! | [`FeeCeilingCheck`] | [`VerdictKind::FeeTooHigh`] |
//! | [`WhitelistCheck`] | [`VerdictKind::DestinationNotWhitelisted`] |
//!
//! [`DefaultPolicyEngine`]: crate::engine::DefaultPolicyEngine

use agentguard_core::address::{Address, AddressFormat};
use agentguard_core::amount::{format_ether_amount, format_gwei_amount};
use agentguard_core::types::{FeeEstimate, TransactionProposal, Verdict, VerdictKind};
use alloy_primitives::U256;
use std::collections::HashSet;

/// Everything a check may look at for one evaluation.
///
/// The fee is a single snapshot taken before evaluation starts.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// The proposal under evaluation.
    pub proposal: &'a TransactionProposal,
    /// The fee snapshot for this evaluation.
    pub fee: FeeEstimate,
}

impl<'a> CheckContext<'a> {
    /// Bundles a proposal with its fee snapshot.
    #[must_use]
    pub const fn new(proposal: &'a TransactionProposal, fee: FeeEstimate) -> Self {
        Self { proposal, fee }
    }
}

/// One rule of the policy pipeline.
///
/// Implementations must be pure: no I/O, no interior mutability that changes
/// the outcome, no panics for any input.
pub trait PolicyCheck: Send + Sync {
    /// Stable rule name, matching [`VerdictKind::rule_name`] of the verdicts
    /// this check produces.
    fn name(&self) -> &'static str;

    /// Returns a blocking verdict, or `None` to let the proposal continue.
    fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict>;
}

/// Rejects destinations that do not follow the configured [`AddressFormat`].
#[derive(Debug, Clone)]
pub struct AddressFormatCheck {
    format: AddressFormat,
}

impl AddressFormatCheck {
    /// Creates the check for `format`.
    #[must_use]
    pub const fn new(format: AddressFormat) -> Self {
        Self { format }
    }
}

impl PolicyCheck for AddressFormatCheck {
    fn name(&self) -> &'static str {
        "address_format"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let error = self.format.validate(&ctx.proposal.destination).err()?;
        Some(Verdict::blocked(
            VerdictKind::MalformedAddress,
            format!("malformed destination: {error}"),
        ))
    }
}

/// Rejects amounts strictly above the per-transaction ceiling.
#[derive(Debug, Clone)]
pub struct TransactionLimitCheck {
    max: U256,
}

impl TransactionLimitCheck {
    /// Creates the check with a ceiling in wei.
    #[must_use]
    pub const fn new(max: U256) -> Self {
        Self { max }
    }
}

impl PolicyCheck for TransactionLimitCheck {
    fn name(&self) -> &'static str {
        "tx_limit"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let amount = ctx.proposal.amount;
        if amount <= self.max {
            return None;
        }
        Some(Verdict::blocked(
            VerdictKind::AmountExceedsLimit,
            format!(
                "amount {} ETH exceeds transaction limit {} ETH",
                format_ether_amount(amount),
                format_ether_amount(self.max)
            ),
        ))
    }
}

/// Rejects evaluations whose fee snapshot is strictly above the ceiling.
#[derive(Debug, Clone)]
pub struct FeeCeilingCheck {
    max: U256,
}

impl FeeCeilingCheck {
    /// Creates the check with a ceiling in wei per gas.
    #[must_use]
    pub const fn new(max: U256) -> Self {
        Self { max }
    }
}

impl PolicyCheck for FeeCeilingCheck {
    fn name(&self) -> &'static str {
        "fee_ceiling"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let fee = ctx.fee.wei();
        if fee <= self.max {
            return None;
        }
        Some(Verdict::blocked(
            VerdictKind::FeeTooHigh,
            format!(
                "network fee {} gwei exceeds ceiling {} gwei",
                format_gwei_amount(fee),
                format_gwei_amount(self.max)
            ),
        ))
    }
}

/// Requires a whitelisted destination for amounts above the exemption.
///
/// Membership compares normalized addresses, so checksum casing is ignored.
/// A destination that cannot be parsed is never a member.
#[derive(Debug, Clone)]
pub struct WhitelistCheck {
    whitelist: HashSet<Address>,
    format: AddressFormat,
    exemption: U256,
}

impl WhitelistCheck {
    /// Creates the check from already-validated addresses.
    #[must_use]
    pub fn new(
        whitelist: impl IntoIterator<Item = Address>,
        format: AddressFormat,
        exemption: U256,
    ) -> Self {
        Self {
            whitelist: whitelist.into_iter().collect(),
            format,
            exemption,
        }
    }

    /// Returns `true` if `destination` is a whitelist member.
    #[must_use]
    pub fn contains(&self, destination: &str) -> bool {
        Address::parse(destination, &self.format)
            .map(|address| self.whitelist.contains(&address))
            .unwrap_or(false)
    }

    /// Number of distinct whitelisted addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.whitelist.len()
    }

    /// Returns `true` if nothing is whitelisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.whitelist.is_empty()
    }
}

impl PolicyCheck for WhitelistCheck {
    fn name(&self) -> &'static str {
        "whitelist"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Option<Verdict> {
        let proposal = ctx.proposal;
        if proposal.amount <= self.exemption || self.contains(&proposal.destination) {
            return None;
        }
        Some(Verdict::blocked(
            VerdictKind::DestinationNotWhitelisted,
            format!(
                "destination {} is not whitelisted and {} ETH is above the {} ETH exemption",
                proposal.destination,
                format_ether_amount(proposal.amount),
                format_ether_amount(self.exemption)
            ),
        ))
    }
}
