//! Fuzz target for policy evaluation.
//!
//! Builds a policy and a proposal from arbitrary input and checks that
//! evaluation never panics and always agrees with the check order.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run policy_rules
//! ```

#![no_main]

use agentguard_core::address::AddressFormat;
use agentguard_core::config::PolicyConfig;
use agentguard_core::types::{FeeEstimate, TransactionProposal, VerdictKind};
use agentguard_policy::{DefaultPolicyEngine, PolicyEngine};
use alloy_primitives::U256;
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

/// Fuzz input representing one policy evaluation.
#[derive(Debug, Arbitrary)]
struct PolicyFuzzInput {
    /// Destination as raw 20 bytes, hex-encoded when `raw_destination` is `None`
    destination: [u8; 20],
    /// Arbitrary destination text, used instead of `destination` when present
    raw_destination: Option<String>,
    /// Uppercase the hex body of the destination
    uppercase: bool,
    /// Amount in wei
    amount: u128,
    /// Fee in wei per gas
    fee: u64,
    /// Whitelist entries (indices into predefined list)
    whitelist_indices: Vec<u8>,
    /// Whether the destination itself is whitelisted
    whitelist_destination: bool,
    /// Transaction ceiling in wei
    max_amount: u128,
    /// Fee ceiling in wei per gas, `None` disables the check
    max_fee: Option<u64>,
    /// Small-transfer exemption in wei
    exemption: u128,
}

/// Predefined addresses for whitelist testing
const PREDEFINED_ADDRESSES: [&str; 4] = [
    "0x0000000000000000000000000000000000000001",
    "0x1234567890abcdef1234567890abcdef12345678",
    "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
    "0xabcdef1234567890abcdef1234567890abcdef12",
];

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(input) = PolicyFuzzInput::arbitrary(&mut unstructured) else {
        return;
    };

    let destination = match input.raw_destination {
        Some(raw) => raw,
        None if input.uppercase => format!("0x{}", hex::encode_upper(input.destination)),
        None => format!("0x{}", hex::encode(input.destination)),
    };

    let mut whitelist: Vec<String> = input
        .whitelist_indices
        .iter()
        .map(|&i| PREDEFINED_ADDRESSES[usize::from(i) % PREDEFINED_ADDRESSES.len()].to_string())
        .collect();
    let well_formed = AddressFormat::evm().is_well_formed(&destination);
    if input.whitelist_destination && well_formed {
        whitelist.push(destination.clone());
    }

    let mut config = PolicyConfig::new()
        .with_whitelist(whitelist)
        .with_max_transaction_amount(U256::from(input.max_amount))
        .with_small_transfer_exemption(U256::from(input.exemption));
    config = match input.max_fee {
        Some(max) => config.with_max_fee_threshold(U256::from(max)),
        None => config.without_fee_check(),
    };

    let Ok(engine) = DefaultPolicyEngine::new(config) else {
        return;
    };

    let proposal = TransactionProposal::new(destination.clone(), U256::from(input.amount));
    let fee = FeeEstimate::new(U256::from(input.fee));

    // Evaluation must be total and deterministic.
    let verdict = engine.evaluate(&proposal, fee);
    assert_eq!(verdict, engine.evaluate(&proposal, fee));
    assert_eq!(verdict.authorized, verdict.kind == VerdictKind::Verified);

    // The first failing check decides.
    let expected = if !well_formed {
        VerdictKind::MalformedAddress
    } else if input.amount > input.max_amount {
        VerdictKind::AmountExceedsLimit
    } else if input.max_fee.is_some_and(|max| input.fee > max) {
        VerdictKind::FeeTooHigh
    } else if input.amount > input.exemption && !engine.config().is_whitelisted(&destination) {
        VerdictKind::DestinationNotWhitelisted
    } else {
        VerdictKind::Verified
    };
    assert_eq!(verdict.kind, expected, "{proposal:?} fee={fee:?}");
});
