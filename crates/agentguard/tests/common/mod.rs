//! # Test Utilities for `AgentGuard`
//!
//! Shared helpers for the integration tests.
//!
//! ## Functions
//!
//! - [`temp_data_dir`] - Create an isolated temporary directory for test data
//! - [`write_reference_config`] - Write the reference policy to disk
//! - [`reference_engine`] - The same policy as an engine
//!
//! ## Proptest Strategies
//!
//! - [`ethereum_address`] - Generate well-formed destinations
//! - [`ether_amount`] - Generate decimal ETH amounts as strings

#![allow(dead_code)]
// Allow expect() in test utilities since panicking on setup failures is acceptable in tests
#![allow(clippy::expect_used)]

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use agentguard_core::config::PolicyConfig;
use agentguard_core::types::TransactionProposal;
use agentguard_core::U256;
use agentguard_policy::DefaultPolicyEngine;
use proptest::prelude::*;
use tempfile::TempDir;

/// A destination on the reference whitelist.
pub const WHITELISTED: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// A well-formed destination that is not whitelisted.
pub const STRANGER: &str = "0xfedcba0987654321fedcba0987654321fedcba09";

/// The reference policy: 1.5 ETH limit, 50 gwei ceiling, 0.1 ETH exemption,
/// and a 30 gwei configured fee estimate.
pub const REFERENCE_CONFIG: &str = r#"
[policy]
whitelist = ["0x1234567890abcdef1234567890abcdef12345678"]
max_transaction_amount = "1.5"
max_fee_threshold = "50"
small_transfer_exemption_amount = "0.1"

[fee]
estimate_gwei = "30"
timeout_ms = 500
"#;

/// Create a temporary directory for test data.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn temp_data_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("agentguard-test-")
        .tempdir()
        .expect("Failed to create temporary directory for test")
}

/// Write [`REFERENCE_CONFIG`] to `dir/config.toml` and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_reference_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, REFERENCE_CONFIG).expect("Failed to write reference config");
    path
}

/// An amount in thousandths of an ether.
#[must_use]
pub fn milli_eth(n: u64) -> U256 {
    U256::from(n) * U256::from(1_000_000_000_000_000u64)
}

/// The reference policy as an engine.
///
/// # Panics
///
/// Panics if the policy is rejected.
#[must_use]
pub fn reference_engine() -> DefaultPolicyEngine {
    let config = PolicyConfig::new()
        .with_whitelist(vec![WHITELISTED.to_string()])
        .with_max_transaction_amount(milli_eth(1500))
        .with_max_fee_threshold(U256::from(50_000_000_000u64))
        .with_small_transfer_exemption(milli_eth(100));
    DefaultPolicyEngine::new(config).expect("reference policy should be valid")
}

/// Scenarios A to E as proposals, in order.
#[must_use]
pub fn reference_scenarios() -> Vec<TransactionProposal> {
    vec![
        TransactionProposal::new(WHITELISTED, milli_eth(500)),
        TransactionProposal::new("0xScamAddress888", milli_eth(10_000)),
        TransactionProposal::new(WHITELISTED, milli_eth(5000)),
        TransactionProposal::new(STRANGER, milli_eth(200)),
        TransactionProposal::new(STRANGER, milli_eth(50)),
    ]
}

/// The scenarios as newline-delimited JSON.
///
/// # Panics
///
/// Panics if a proposal cannot be serialized.
#[must_use]
pub fn reference_scenarios_jsonl() -> String {
    let mut out = String::new();
    for proposal in reference_scenarios() {
        let line = serde_json::to_string(&proposal).expect("proposal should serialize");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

// =============================================================================
// Proptest Strategies
// =============================================================================

/// Generate a well-formed destination (`0x` + 40 hex characters).
pub fn ethereum_address() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::num::u8::ANY, 20).prop_map(|bytes| {
        let mut hex = String::with_capacity(42);
        hex.push_str("0x");
        for b in bytes {
            let _ = write!(hex, "{b:02x}");
        }
        hex
    })
}

/// Generate a decimal ETH amount between 0 and 10 with up to 18 fractional digits.
pub fn ether_amount() -> impl Strategy<Value = String> {
    (0u64..10, "[0-9]{0,18}").prop_map(|(whole, fraction)| {
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_data_dir_isolation() {
        let dir1 = temp_data_dir();
        let dir2 = temp_data_dir();

        assert_ne!(dir1.path(), dir2.path(), "Each temp dir should be unique");
    }

    #[test]
    fn test_reference_scenarios_round_trip_through_json() {
        let jsonl = reference_scenarios_jsonl();
        assert_eq!(jsonl.lines().count(), 5);
    }

    proptest! {
        #[test]
        fn test_ethereum_address_format(addr in ethereum_address()) {
            prop_assert!(addr.starts_with("0x"));
            prop_assert_eq!(addr.len(), 42);
            for c in addr.chars().skip(2) {
                prop_assert!(c.is_ascii_hexdigit());
            }
        }

        #[test]
        fn test_ether_amount_parseable(amount in ether_amount()) {
            prop_assert!(agentguard_core::parse_ether_amount(&amount).is_ok());
        }
    }
}
