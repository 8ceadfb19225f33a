//! # CLI Command Handlers
//!
//! - [`init`] - Write the default configuration
//! - [`config`] - Show the effective configuration or its path
//! - [`check`] - Judge one proposal
//! - [`run`] - Judge a stream of JSON proposals
//! - [`demo`] - Replay the built-in scenarios
//!
//! Each handler is a struct built with `new` and executed with `run`, returning
//! its own error type. `main` turns errors into exit codes from
//! [`exit_codes`].

pub mod check;
pub mod config;
pub mod demo;
pub mod exit_codes;
pub mod init;
pub mod run;

use std::path::{Path, PathBuf};

use agentguard_core::amount::parse_gwei_amount;
use agentguard_core::config::{Config, FeeConfig, PolicyConfig};
use agentguard_core::config_loader::ConfigLoader;
use agentguard_core::error::{ConfigError, ParseError, PolicyError};
use agentguard_core::types::FeeEstimate;
use agentguard_policy::DefaultPolicyEngine;

pub use check::{CheckCommand, CheckCommandError, CheckReport};
pub use config::{ConfigCommand, ConfigCommandError};
pub use demo::{DemoCommand, DemoError};
pub use init::{InitCommand, InitError};
pub use run::{RunCommand, RunCommandError};

/// Where the configuration lives: the explicit path, or the default location.
pub(crate) fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(ConfigLoader::new()?.config_path()),
    }
}

/// Loads the configuration commands run with.
///
/// An explicit path must exist. The default location falls back to built-in
/// defaults when no file is there.
pub(crate) fn load_effective_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => ConfigLoader::load_from(path),
        None => ConfigLoader::new()?.load(),
    }
}

/// Builds the policy engine, warning about settings that make a check inert.
pub(crate) fn build_engine(policy: PolicyConfig) -> Result<DefaultPolicyEngine, PolicyError> {
    if policy.exemption_shadows_whitelist() {
        tracing::warn!(
            exemption = %agentguard_core::format_ether_amount(policy.small_transfer_exemption_amount),
            max = %agentguard_core::format_ether_amount(policy.max_transaction_amount),
            "small-transfer exemption is not below the transaction limit; the whitelist check can never block"
        );
    }
    let engine = DefaultPolicyEngine::new(policy)?;
    tracing::debug!(checks = ?engine.check_names(), "policy engine ready");
    Ok(engine)
}

/// The fee to evaluate with: `--fee-gwei` if given, else the configured estimate.
///
/// Returns `Ok(None)` when neither is available.
pub(crate) fn resolve_fee(
    override_gwei: Option<&str>,
    config: &FeeConfig,
) -> Result<Option<FeeEstimate>, ParseError> {
    match override_gwei {
        Some(raw) => parse_gwei_amount(raw).map(|wei| Some(FeeEstimate::new(wei))),
        None => Ok(config.estimate_gwei.map(FeeEstimate::new)),
    }
}
