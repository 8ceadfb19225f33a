//! Policy engine for proposal evaluation.
//!
//! The engine turns a [`TransactionProposal`] and a fee snapshot into a
//! [`Verdict`] using fixed, auditable rules.
//!
//! # Rule Evaluation Order
//!
//! Rules are evaluated in strict order and evaluation stops at the first
//! failure:
//!
//! 1. **Address format** - A malformed destination is blocked immediately,
//!    whatever the amount.
//! 2. **Transaction limit** - Amounts above `max_transaction_amount` are blocked.
//! 3. **Fee ceiling** - Fees above `max_fee_threshold` are blocked. Skipped when
//!    no ceiling is configured.
//! 4. **Whitelist** - Amounts above `small_transfer_exemption_amount` must go to
//!    a whitelisted destination.
//! 5. **Verified** - If all checks pass, the proposal is authorized.
//!
//! Every comparison is strict, so a value exactly at a limit passes.
//!
//! # Thread Safety
//!
//! The [`DefaultPolicyEngine`] is `Send + Sync` and immutable after
//! construction; share it behind an `Arc` for parallel evaluation.
//!
//! # Example
//!
//! ```
//! use agentguard_core::config::PolicyConfig;
//! use agentguard_core::types::{FeeEstimate, TransactionProposal, VerdictKind};
//! use agentguard_policy::engine::{DefaultPolicyEngine, PolicyEngine};
//! use alloy_primitives::U256;
//!
//! let config = PolicyConfig::new()
//!     .with_whitelist(vec!["0x1234567890abcdef1234567890abcdef12345678".to_string()]);
//! let engine = DefaultPolicyEngine::new(config).unwrap();
//!
//! let proposal = TransactionProposal::new("0xScamAddress888", U256::from(1u64));
//! let verdict = engine.evaluate(&proposal, FeeEstimate::from_gwei(30));
//! assert_eq!(verdict.kind, VerdictKind::MalformedAddress);
//! ```

use crate::checks::{
    AddressFormatCheck, CheckContext, FeeCeilingCheck, PolicyCheck, TransactionLimitCheck,
    WhitelistCheck,
};
use agentguard_core::config::PolicyConfig;
use agentguard_core::error::PolicyError;
use agentguard_core::types::{FeeEstimate, TransactionProposal, Verdict};
use std::sync::Arc;

/// Trait for policy engines that decide proposals.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one engine can serve many
/// concurrent evaluations.
pub trait PolicyEngine: Send + Sync {
    /// Decides whether `proposal` may be executed given the fee snapshot.
    ///
    /// Evaluation has no error channel: every input, however malformed,
    /// produces a verdict.
    fn evaluate(&self, proposal: &TransactionProposal, fee: FeeEstimate) -> Verdict;
}

impl<T: PolicyEngine + ?Sized> PolicyEngine for Arc<T> {
    fn evaluate(&self, proposal: &TransactionProposal, fee: FeeEstimate) -> Verdict {
        (**self).evaluate(proposal, fee)
    }
}

/// Default policy engine implementation.
///
/// Holds the validated configuration and the ordered list of checks derived
/// from it.
pub struct DefaultPolicyEngine {
    /// Policy configuration the checks were built from.
    config: PolicyConfig,
    /// Checks in evaluation order.
    checks: Vec<Box<dyn PolicyCheck>>,
}

impl std::fmt::Debug for DefaultPolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultPolicyEngine")
            .field("config", &self.config)
            .field("checks", &self.check_names())
            .finish()
    }
}

impl DefaultPolicyEngine {
    /// Creates a new policy engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfiguration`] if the configuration is
    /// invalid (for example a malformed whitelist entry). This is the only
    /// point at which the engine can fail.
    ///
    /// # Example
    ///
    /// ```
    /// use agentguard_core::config::PolicyConfig;
    /// use agentguard_policy::engine::DefaultPolicyEngine;
    ///
    /// let engine = DefaultPolicyEngine::new(PolicyConfig::new().without_fee_check()).unwrap();
    /// assert_eq!(engine.check_names(), vec!["address_format", "tx_limit", "whitelist"]);
    ///
    /// let bad = PolicyConfig::new().with_whitelist(vec!["0xMe".to_string()]);
    /// assert!(DefaultPolicyEngine::new(bad).is_err());
    /// ```
    pub fn new(config: PolicyConfig) -> Result<Self, PolicyError> {
        config.validate()?;

        let whitelist = config.whitelist_addresses()?;

        let mut checks: Vec<Box<dyn PolicyCheck>> = vec![
            Box::new(AddressFormatCheck::new(config.address_format.clone())),
            Box::new(TransactionLimitCheck::new(config.max_transaction_amount)),
        ];
        if let Some(max_fee) = config.max_fee_threshold {
            checks.push(Box::new(FeeCeilingCheck::new(max_fee)));
        }
        checks.push(Box::new(WhitelistCheck::new(
            whitelist,
            config.address_format.clone(),
            config.small_transfer_exemption_amount,
        )));

        Ok(Self { config, checks })
    }

    /// The configuration this engine enforces.
    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Names of the active checks, in evaluation order.
    #[must_use]
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }
}

impl PolicyEngine for DefaultPolicyEngine {
    fn evaluate(&self, proposal: &TransactionProposal, fee: FeeEstimate) -> Verdict {
        let ctx = CheckContext::new(proposal, fee);
        self.checks
            .iter()
            .find_map(|check| check.check(&ctx))
            .unwrap_or_else(Verdict::verified)
    }
}
