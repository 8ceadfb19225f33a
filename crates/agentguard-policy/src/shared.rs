//! Runtime reconfiguration by snapshot swap.
//!
//! A [`SharedPolicyEngine`] holds the current [`DefaultPolicyEngine`] behind an
//! `Arc`. Evaluations grab the current snapshot and run entirely against it;
//! [`SharedPolicyEngine::replace`] builds and validates a new engine first and
//! only then publishes it, so readers see either the old policy or the new one
//! and never a mix.

use crate::engine::{DefaultPolicyEngine, PolicyEngine};
use agentguard_core::config::PolicyConfig;
use agentguard_core::error::PolicyError;
use agentguard_core::types::{FeeEstimate, TransactionProposal, Verdict};
use std::sync::{Arc, PoisonError, RwLock};

/// A policy engine whose configuration can be swapped while in use.
///
/// # Example
///
/// ```
/// use agentguard_core::config::PolicyConfig;
/// use agentguard_policy::shared::SharedPolicyEngine;
/// use alloy_primitives::U256;
///
/// let shared = SharedPolicyEngine::new(PolicyConfig::new()).unwrap();
/// let before = shared.snapshot();
///
/// shared
///     .replace(PolicyConfig::new().with_max_transaction_amount(U256::from(5u64)))
///     .unwrap();
///
/// assert_eq!(shared.snapshot().config().max_transaction_amount, U256::from(5u64));
/// // Old snapshots stay valid for whoever holds them.
/// assert_ne!(before.config().max_transaction_amount, U256::from(5u64));
/// ```
#[derive(Debug)]
pub struct SharedPolicyEngine {
    current: RwLock<Arc<DefaultPolicyEngine>>,
}

impl SharedPolicyEngine {
    /// Creates a shared engine from an initial configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: PolicyConfig) -> Result<Self, PolicyError> {
        Ok(Self::from_engine(DefaultPolicyEngine::new(config)?))
    }

    /// Wraps an already-built engine.
    #[must_use]
    pub fn from_engine(engine: DefaultPolicyEngine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    /// The engine currently in force.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DefaultPolicyEngine> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Validates `config` and, if valid, makes it the policy in force.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfiguration`] if `config` is invalid; the
    /// previous policy then stays in force.
    pub fn replace(&self, config: PolicyConfig) -> Result<(), PolicyError> {
        let next = Arc::new(DefaultPolicyEngine::new(config)?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
        Ok(())
    }
}

impl PolicyEngine for SharedPolicyEngine {
    fn evaluate(&self, proposal: &TransactionProposal, fee: FeeEstimate) -> Verdict {
        self.snapshot().evaluate(proposal, fee)
    }
}
