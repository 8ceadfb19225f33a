//! Configuration types for the `AgentGuard` policy guard.
//!
//! This module provides the configuration structures that define which
//! proposals the guard authorizes, how it obtains fee estimates, and how the
//! demo agent behaves.
//!
//! # Configuration File
//!
//! Configuration is stored in TOML format at `~/.agentguard/config.toml`.
//! Amounts are written as decimal ether strings and fees as decimal gwei
//! strings.
//!
//! # Examples
//!
//! ```
//! use agentguard_core::config::Config;
//! use alloy_primitives::U256;
//!
//! let config = Config::default();
//! assert_eq!(
//!     config.policy.max_transaction_amount,
//!     U256::from(1_000_000_000_000_000_000u64)
//! );
//! assert_eq!(config.fee.timeout_ms, 2000);
//!
//! let toml_str = Config::default_toml();
//! assert!(toml_str.contains("[policy]"));
//! ```
//!
//! # Default TOML Output
//!
//! ```toml
//! [policy]
//! whitelist = []
//! max_transaction_amount = "1.0"
//! max_fee_threshold = "50"
//! small_transfer_exemption_amount = "0.1"
//!
//! [policy.address_format]
//! prefix = "0x"
//! length = 42
//! require_hex = true
//!
//! [fee]
//! estimate_gwei = "30"
//! timeout_ms = 2000
//!
//! [agent]
//! rounds = 3
//! ```

use crate::address::{Address, AddressFormat};
use crate::amount::{self, WEI_PER_ETHER, WEI_PER_GWEI};
use crate::error::{ConfigError, PolicyError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the `AgentGuard` service.
///
/// - **Policy**: The fixed rules every proposal is evaluated against
/// - **Fee**: Static fee estimate and estimator timeout
/// - **Agent**: Operator wallet and demo settings
///
/// # Examples
///
/// ```
/// use agentguard_core::config::Config;
///
/// let toml_str = r#"
/// [policy]
/// whitelist = ["0x1234567890abcdef1234567890abcdef12345678"]
/// max_transaction_amount = "1.5"
///
/// [fee]
/// timeout_ms = 500
/// "#;
///
/// let config: Config = toml::from_str(toml_str).expect("valid TOML");
/// assert_eq!(config.fee.timeout_ms, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Policy rules.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Fee-estimation settings.
    #[serde(default)]
    pub fee: FeeConfig,

    /// Agent settings.
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_max_transaction_amount() -> U256 {
    U256::from(WEI_PER_ETHER)
}

fn default_max_fee_threshold() -> Option<U256> {
    Some(U256::from(50 * WEI_PER_GWEI))
}

fn default_small_transfer_exemption() -> U256 {
    U256::from(WEI_PER_ETHER / 10)
}

/// The fixed rules a proposal must satisfy to be authorized.
///
/// Checks run in this order and stop at the first failure:
///
/// 1. the destination follows `address_format`
/// 2. the amount is not above `max_transaction_amount`
/// 3. the fee is not above `max_fee_threshold` (skipped when `None`)
/// 4. the destination is whitelisted, unless the amount is not above
///    `small_transfer_exemption_amount`
///
/// # Address Handling
///
/// Whitelist comparisons are case-insensitive, so `0xABC…` and `0xabc…` are
/// the same destination.
///
/// # Examples
///
/// ```
/// use agentguard_core::config::PolicyConfig;
/// use alloy_primitives::U256;
///
/// let config = PolicyConfig::new()
///     .with_whitelist(vec!["0xABCDEF1234567890ABCDEF1234567890ABCDEF12".to_string()])
///     .with_max_transaction_amount(U256::from(1_500_000_000_000_000_000u64));
///
/// assert!(config.is_whitelisted("0xabcdef1234567890abcdef1234567890abcdef12"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Destinations allowed to receive non-exempt amounts.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Largest amount a single proposal may move, in wei.
    ///
    /// Default: 1.0 ETH
    #[serde(
        default = "default_max_transaction_amount",
        with = "amount::ether"
    )]
    pub max_transaction_amount: U256,

    /// Largest acceptable fee, in wei per gas. `None` disables the fee check.
    ///
    /// Default: 50 gwei
    #[serde(
        default = "default_max_fee_threshold",
        with = "amount::option_gwei"
    )]
    pub max_fee_threshold: Option<U256>,

    /// Amounts at or below this skip the whitelist check, in wei.
    ///
    /// Default: 0.1 ETH
    #[serde(
        default = "default_small_transfer_exemption",
        with = "amount::ether"
    )]
    pub small_transfer_exemption_amount: U256,

    /// What a well-formed destination looks like.
    #[serde(default)]
    pub address_format: AddressFormat,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            whitelist: Vec::new(),
            max_transaction_amount: default_max_transaction_amount(),
            max_fee_threshold: default_max_fee_threshold(),
            small_transfer_exemption_amount: default_small_transfer_exemption(),
            address_format: AddressFormat::default(),
        }
    }
}

impl PolicyConfig {
    /// Creates a policy with default limits and an empty whitelist.
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::PolicyConfig;
    ///
    /// let config = PolicyConfig::new();
    /// assert!(config.whitelist.is_empty());
    /// assert!(config.max_fee_threshold.is_some());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if an address is in the whitelist.
    ///
    /// Address comparison is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::PolicyConfig;
    ///
    /// let config = PolicyConfig::new()
    ///     .with_whitelist(vec!["0xABC123".to_string()]);
    ///
    /// assert!(config.is_whitelisted("0xABC123"));
    /// assert!(config.is_whitelisted("0xabc123"));
    /// assert!(!config.is_whitelisted("0xDEF456"));
    /// ```
    #[must_use]
    pub fn is_whitelisted(&self, address: &str) -> bool {
        self.whitelist
            .iter()
            .any(|a| a.eq_ignore_ascii_case(address))
    }

    /// The whitelist as validated, normalized addresses.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfiguration`] naming the first entry
    /// that does not follow `address_format`.
    pub fn whitelist_addresses(&self) -> Result<Vec<Address>, PolicyError> {
        self.whitelist
            .iter()
            .map(|entry| {
                Address::parse(entry, &self.address_format).map_err(|e| {
                    PolicyError::invalid_configuration(format!("whitelist entry rejected: {e}"))
                })
            })
            .collect()
    }

    /// Returns `true` when the exemption covers every amount the ceiling allows,
    /// so the whitelist check can never fire.
    #[must_use]
    pub fn exemption_shadows_whitelist(&self) -> bool {
        self.small_transfer_exemption_amount >= self.max_transaction_amount
    }

    /// Validates the policy configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfiguration`] if:
    /// - `address_format` leaves no room for an address body
    /// - a whitelist entry does not follow `address_format`
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::PolicyConfig;
    ///
    /// let valid = PolicyConfig::new()
    ///     .with_whitelist(vec!["0x1234567890abcdef1234567890abcdef12345678".to_string()]);
    /// assert!(valid.validate().is_ok());
    ///
    /// let invalid = PolicyConfig::new()
    ///     .with_whitelist(vec!["0xScamAddress888".to_string()]);
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.address_format
            .check_consistency()
            .map_err(PolicyError::invalid_configuration)?;

        self.whitelist_addresses()?;

        Ok(())
    }

    /// Builder method to set the whitelist.
    #[must_use]
    pub fn with_whitelist(mut self, addresses: Vec<String>) -> Self {
        self.whitelist = addresses;
        self
    }

    /// Builder method to set the per-transaction ceiling, in wei.
    #[must_use]
    pub const fn with_max_transaction_amount(mut self, amount: U256) -> Self {
        self.max_transaction_amount = amount;
        self
    }

    /// Builder method to set the fee ceiling, in wei per gas.
    #[must_use]
    pub const fn with_max_fee_threshold(mut self, threshold: U256) -> Self {
        self.max_fee_threshold = Some(threshold);
        self
    }

    /// Builder method to disable the fee check.
    ///
    /// ```
    /// use agentguard_core::config::PolicyConfig;
    ///
    /// assert!(PolicyConfig::new().without_fee_check().max_fee_threshold.is_none());
    /// ```
    #[must_use]
    pub const fn without_fee_check(mut self) -> Self {
        self.max_fee_threshold = None;
        self
    }

    /// Builder method to set the small-transfer exemption, in wei.
    #[must_use]
    pub const fn with_small_transfer_exemption(mut self, amount: U256) -> Self {
        self.small_transfer_exemption_amount = amount;
        self
    }

    /// Builder method to set the address format.
    #[must_use]
    pub fn with_address_format(mut self, format: AddressFormat) -> Self {
        self.address_format = format;
        self
    }
}

fn default_estimate_gwei() -> Option<U256> {
    Some(U256::from(30 * WEI_PER_GWEI))
}

const fn default_fee_timeout_ms() -> u64 {
    2000
}

/// Fee-estimation settings.
///
/// No live gas oracle is queried; `estimate_gwei` is the value injected into
/// each evaluation unless the caller overrides it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeConfig {
    /// Static fee estimate in wei per gas. `None` (written `"off"`) leaves the
    /// guard without an estimate, so every proposal is skipped.
    ///
    /// Default: 30 gwei
    #[serde(
        default = "default_estimate_gwei",
        with = "amount::option_gwei"
    )]
    pub estimate_gwei: Option<U256>,

    /// How long a fee estimator may take, in milliseconds.
    ///
    /// Default: 2000
    #[serde(default = "default_fee_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            estimate_gwei: default_estimate_gwei(),
            timeout_ms: default_fee_timeout_ms(),
        }
    }
}

const fn default_rounds() -> u32 {
    3
}

/// Agent settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    /// The operator's own wallet address. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// How many proposals `agentguard demo` replays.
    ///
    /// Default: 3
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            owner: None,
            rounds: default_rounds(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `fee.timeout_ms` is zero
    /// - `agent.owner` is set but malformed
    ///
    /// Returns a wrapped [`PolicyError`] (via [`ConfigError::ParseFailed`]) if
    /// the policy section is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// let mut invalid = Config::default();
    /// invalid.fee.timeout_ms = 0;
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee.timeout_ms == 0 {
            return Err(ConfigError::invalid_value("fee.timeout_ms", "0"));
        }

        if let Some(owner) = &self.agent.owner {
            if !self.policy.address_format.is_well_formed(owner) {
                return Err(ConfigError::invalid_value("agent.owner", owner.clone()));
            }
        }

        self.policy.validate()?;

        Ok(())
    }

    /// Generates the default configuration as a commented TOML string.
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::Config;
    ///
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[policy]"));
    /// assert!(toml.contains("[fee]"));
    /// assert!(toml.contains("[agent]"));
    /// ```
    #[must_use]
    pub fn default_toml() -> String {
        r#"[policy]
# Destinations allowed to receive more than the small-transfer exemption.
whitelist = []
# Largest amount a single transaction may move, in ETH.
max_transaction_amount = "1.0"
# Largest acceptable network fee, in gwei. "off" disables the check.
max_fee_threshold = "50"
# Transfers at or below this amount (ETH) skip the whitelist check.
small_transfer_exemption_amount = "0.1"

[policy.address_format]
prefix = "0x"
length = 42
require_hex = true

[fee]
# Static fee estimate injected into each evaluation, in gwei.
estimate_gwei = "30"
timeout_ms = 2000

[agent]
# owner = "0x..."
rounds = 3
"#
        .to_string()
    }

    /// Creates a configuration builder for customizing values.
    ///
    /// # Examples
    ///
    /// ```
    /// use agentguard_core::config::Config;
    ///
    /// let config = Config::builder()
    ///     .fee_timeout_ms(500)
    ///     .rounds(10)
    ///     .build();
    ///
    /// assert_eq!(config.fee.timeout_ms, 500);
    /// assert_eq!(config.agent.rounds, 10);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for creating customized [`Config`] instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the policy configuration.
    #[must_use]
    pub fn policy(mut self, policy: PolicyConfig) -> Self {
        self.config.policy = policy;
        self
    }

    /// Sets the static fee estimate, in wei per gas.
    #[must_use]
    pub const fn fee_estimate(mut self, wei: U256) -> Self {
        self.config.fee.estimate_gwei = Some(wei);
        self
    }

    /// Sets the fee-estimator timeout.
    #[must_use]
    pub const fn fee_timeout_ms(mut self, ms: u64) -> Self {
        self.config.fee.timeout_ms = ms;
        self
    }

    /// Sets the operator wallet.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.config.agent.owner = Some(owner.into());
        self
    }

    /// Sets the number of demo rounds.
    #[must_use]
    pub const fn rounds(mut self, rounds: u32) -> Self {
        self.config.agent.rounds = rounds;
        self
    }

    /// Builds the final configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::indexing_slicing,
        clippy::needless_raw_string_hashes,
        clippy::unreadable_literal
    )]

    use super::*;

    const GOOD: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETHER)
    }

    // -------------------------------------------------------------------------
    // Defaults
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.policy.whitelist.is_empty());
        assert_eq!(config.policy.max_transaction_amount, eth(1));
        assert_eq!(
            config.policy.max_fee_threshold,
            Some(U256::from(50_000_000_000u64))
        );
        assert_eq!(
            config.policy.small_transfer_exemption_amount,
            U256::from(100_000_000_000_000_000u64)
        );
        assert_eq!(config.policy.address_format, AddressFormat::evm());
        assert_eq!(config.fee.estimate_gwei, Some(U256::from(30_000_000_000u64)));
        assert_eq!(config.fee.timeout_ms, 2000);
        assert!(config.agent.owner.is_none());
        assert_eq!(config.agent.rounds, 3);
    }

    #[test]
    fn test_config_new() {
        assert_eq!(Config::new(), Config::default());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_toml_matches_default() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    // -------------------------------------------------------------------------
    // PolicyConfig
    // -------------------------------------------------------------------------

    #[test]
    fn test_policy_is_whitelisted_case_insensitive() {
        let config = PolicyConfig::new()
            .with_whitelist(vec!["0x1234567890ABCDEF1234567890ABCDEF12345678".to_string()]);

        assert!(config.is_whitelisted(GOOD));
        assert!(!config.is_whitelisted("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn test_policy_builders() {
        let config = PolicyConfig::new()
            .with_max_transaction_amount(eth(2))
            .with_max_fee_threshold(U256::from(7u64))
            .with_small_transfer_exemption(U256::ZERO)
            .with_address_format(AddressFormat {
                prefix: "acct_".to_string(),
                length: 9,
                require_hex: false,
            });

        assert_eq!(config.max_transaction_amount, eth(2));
        assert_eq!(config.max_fee_threshold, Some(U256::from(7u64)));
        assert_eq!(config.small_transfer_exemption_amount, U256::ZERO);
        assert_eq!(config.address_format.prefix, "acct_");
        assert!(config.without_fee_check().max_fee_threshold.is_none());
    }

    #[test]
    fn test_policy_validate_rejects_malformed_whitelist_entry() {
        let config = PolicyConfig::new().with_whitelist(vec![GOOD.to_string(), "0xMe".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("0xMe"));
    }

    #[test]
    fn test_policy_validate_rejects_degenerate_format() {
        let config = PolicyConfig::new().with_address_format(AddressFormat {
            prefix: "0x".to_string(),
            length: 1,
            require_hex: true,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_whitelist_addresses_are_normalized() {
        let config = PolicyConfig::new()
            .with_whitelist(vec!["0xABCDEF1234567890ABCDEF1234567890ABCDEF12".to_string()]);
        let addresses = config.whitelist_addresses().unwrap();
        assert_eq!(
            addresses[0].as_str(),
            "0xabcdef1234567890abcdef1234567890abcdef12"
        );
    }

    #[test]
    fn test_exemption_above_ceiling_is_accepted_but_flagged() {
        let config = PolicyConfig::new()
            .with_max_transaction_amount(eth(1))
            .with_small_transfer_exemption(eth(2));
        assert!(config.validate().is_ok());
        assert!(config.exemption_shadows_whitelist());
        assert!(!PolicyConfig::default().exemption_shadows_whitelist());
    }

    #[test]
    fn test_policy_toml_amount_strings() {
        let toml_str = r#"
whitelist = ["0x1234567890abcdef1234567890abcdef12345678"]
max_transaction_amount = "1.5"
max_fee_threshold = "50"
small_transfer_exemption_amount = "0.1"
"#;
        let config: PolicyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.max_transaction_amount,
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(config.max_fee_threshold, Some(U256::from(50_000_000_000u64)));
        assert_eq!(config.whitelist.len(), 1);
    }

    #[test]
    fn test_policy_toml_rejects_negative_amount() {
        let result: Result<PolicyConfig, _> = toml::from_str(r#"max_transaction_amount = "-1""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_serialize_without_fee_check() {
        let config = PolicyConfig::new().without_fee_check();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains(r#"max_fee_threshold = "off""#));
        let back: PolicyConfig = toml::from_str(&text).unwrap();
        assert!(back.max_fee_threshold.is_none());

        // A missing key means the default, not "disabled".
        let defaulted: PolicyConfig = toml::from_str("whitelist = []").unwrap();
        assert!(defaulted.max_fee_threshold.is_some());
    }

    // -------------------------------------------------------------------------
    // Config validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config::builder().fee_timeout_ms(0).build();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "fee.timeout_ms"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_malformed_owner() {
        let config = Config::builder().owner("0xMe").build();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "agent.owner"),
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(Config::builder().owner(GOOD).build().validate().is_ok());
    }

    #[test]
    fn test_validate_wraps_policy_error() {
        let config = Config::builder()
            .policy(PolicyConfig::new().with_whitelist(vec!["nope".to_string()]))
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ParseFailed { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .fee_estimate(U256::from(1u64))
            .fee_timeout_ms(10)
            .owner(GOOD)
            .rounds(7)
            .build();

        assert_eq!(config.fee.estimate_gwei, Some(U256::from(1u64)));
        assert_eq!(config.fee.timeout_ms, 10);
        assert_eq!(config.agent.owner.as_deref(), Some(GOOD));
        assert_eq!(config.agent.rounds, 7);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = Config::builder()
            .policy(PolicyConfig::new().with_whitelist(vec![GOOD.to_string()]))
            .owner(GOOD)
            .build();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
