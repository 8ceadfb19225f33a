//! # agentguard-policy
//!
//! Deterministic policy evaluation for the `AgentGuard` policy guard.
//!
//! Given a [`TransactionProposal`](agentguard_core::TransactionProposal) and a
//! fee snapshot, the engine returns a [`Verdict`](agentguard_core::Verdict)
//! computed only from fixed configuration. It performs no I/O, holds no
//! mutable state, and never fails after construction.
//!
//! ## Modules
//!
//! - [`checks`] - The [`PolicyCheck`] trait and the four built-in checks
//! - [`engine`] - [`PolicyEngine`] and the ordered [`DefaultPolicyEngine`]
//! - [`shared`] - [`SharedPolicyEngine`] for swapping policy at runtime
//! - [`fee`] - The [`FeeEstimator`] capability and stub estimators
//!
//! ## Example
//!
//! ```
//! use agentguard_core::{FeeEstimate, PolicyConfig, TransactionProposal, VerdictKind, U256};
//! use agentguard_policy::{DefaultPolicyEngine, PolicyEngine};
//!
//! let engine = DefaultPolicyEngine::new(PolicyConfig::default()).unwrap();
//!
//! // 0.05 ETH to an unknown address is below the small-transfer exemption.
//! let proposal = TransactionProposal::new(
//!     "0xfedcba0987654321fedcba0987654321fedcba09",
//!     U256::from(50_000_000_000_000_000u64),
//! );
//! let verdict = engine.evaluate(&proposal, FeeEstimate::from_gwei(30));
//! assert_eq!(verdict.kind, VerdictKind::Verified);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checks;
pub mod engine;
pub mod fee;
pub mod shared;

pub use checks::{
    AddressFormatCheck, CheckContext, FeeCeilingCheck, PolicyCheck, TransactionLimitCheck,
    WhitelistCheck,
};
pub use engine::{DefaultPolicyEngine, PolicyEngine};
pub use fee::{FeeEstimator, FixedFeeEstimator, ScriptedFeeEstimator};
pub use shared::SharedPolicyEngine;
