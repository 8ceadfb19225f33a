//! # agentguard-core
//!
//! Core types, configuration, and error definitions for the `AgentGuard`
//! policy guard.
//!
//! `AgentGuard` sits between an autonomous agent that proposes transfers and the
//! channel that executes them. This crate holds the vocabulary shared by the
//! policy engine and the CLI.
//!
//! ## Modules
//!
//! - [`address`] - Destination address format and validated [`Address`]
//! - [`amount`] - Decimal ether/gwei parsing into [`U256`] wei
//! - [`types`] - [`TransactionProposal`], [`FeeEstimate`], [`Verdict`]
//! - [`config`] - Policy, fee and agent configuration
//! - [`config_loader`] - Reading and writing `~/.agentguard/config.toml`
//! - [`error`] - Error types and result aliases
//!
//! ## Example
//!
//! ```rust
//! use agentguard_core::{parse_ether_amount, TransactionProposal, U256};
//!
//! let amount = parse_ether_amount("0.5").expect("valid amount");
//! let proposal = TransactionProposal::new("0x1234567890abcdef1234567890abcdef12345678", amount);
//!
//! assert_eq!(proposal.amount, U256::from(500_000_000_000_000_000u64));
//! ```
//!
//! [`Address`]: address::Address
//! [`TransactionProposal`]: types::TransactionProposal
//! [`FeeEstimate`]: types::FeeEstimate
//! [`Verdict`]: types::Verdict

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod amount;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod types;

// Re-export commonly used error types at crate root for convenience
pub use error::{
    AgentGuardError, ConfigError, ConfigResult, FeeError, ParseError, PolicyError, Result,
};

// Re-export config types at crate root for convenience
pub use config::{AgentConfig, Config, ConfigBuilder, FeeConfig, PolicyConfig};

// Re-export config loader types at crate root for convenience
pub use config_loader::{expand_path, load_config, ConfigLoader};

pub use address::{Address, AddressFormat};
pub use amount::{format_ether_amount, format_gwei_amount, parse_ether_amount, parse_gwei_amount};
pub use types::{FeeEstimate, TransactionProposal, Verdict, VerdictKind};

// Re-export U256 from alloy_primitives for working with amounts
pub use alloy_primitives::U256;
