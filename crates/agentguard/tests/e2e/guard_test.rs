//! Integration tests for the guard loop.
//!
//! These tests verify that:
//! - Only authorized proposals reach the sink
//! - Each proposal is judged against exactly one fee snapshot
//! - JSON-lines input and fixture lists produce the same verdicts
//! - Read failures stop the run, malformed records and fee failures only skip a proposal

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use agentguard::guard::{Guard, GuardError, ProposalSource};
use agentguard::sinks::{DryRunSink, RecordingSink};
use agentguard::sources::{builtin_scenarios, JsonLinesSource, ScenarioSource, DEMO_WHITELIST};
use agentguard_core::config::PolicyConfig;
use agentguard_core::types::{FeeEstimate, TransactionProposal, VerdictKind};
use agentguard_policy::{
    DefaultPolicyEngine, FixedFeeEstimator, PolicyEngine, ScriptedFeeEstimator,
    SharedPolicyEngine,
};
use proptest::prelude::*;

use crate::common::{
    ethereum_address, milli_eth, reference_engine, reference_scenarios,
    reference_scenarios_jsonl, STRANGER, WHITELISTED,
};

fn fixed(gwei: u64) -> FixedFeeEstimator {
    FixedFeeEstimator::new(FeeEstimate::from_gwei(gwei))
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_scenarios_through_the_guard() {
    let guard = Guard::new(reference_engine(), fixed(30));
    let mut sink = RecordingSink::new();

    let kinds: Vec<_> = reference_scenarios()
        .iter()
        .map(|p| guard.process(p, &mut sink).unwrap().verdict.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            VerdictKind::Verified,
            VerdictKind::MalformedAddress,
            VerdictKind::AmountExceedsLimit,
            VerdictKind::DestinationNotWhitelisted,
            VerdictKind::Verified,
        ]
    );

    let executed: Vec<_> = sink.executed().iter().map(|p| p.amount).collect();
    assert_eq!(executed, vec![milli_eth(500), milli_eth(50)]);
}

#[test]
fn test_json_lines_matches_fixture_list() {
    let guard = Guard::new(reference_engine(), fixed(30));

    let mut from_json = JsonLinesSource::new(Cursor::new(reference_scenarios_jsonl()));
    let mut from_list = ScenarioSource::new(reference_scenarios());

    let a = guard.run(&mut from_json, &mut RecordingSink::new(), None).unwrap();
    let b = guard.run(&mut from_list, &mut RecordingSink::new(), None).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.evaluated, 5);
}

#[test]
fn test_demo_scenarios_with_demo_whitelist() {
    let policy =
        PolicyConfig::new().with_whitelist(DEMO_WHITELIST.iter().map(ToString::to_string).collect());
    let guard = Guard::new(DefaultPolicyEngine::new(policy).unwrap(), fixed(30));
    let mut sink = DryRunSink::new();

    let summary = guard
        .run(&mut ScenarioSource::new(builtin_scenarios()), &mut sink, None)
        .unwrap();

    assert_eq!(summary.authorized, 1);
    assert_eq!(summary.count(VerdictKind::MalformedAddress), 1);
    assert_eq!(summary.count(VerdictKind::DestinationNotWhitelisted), 1);
    assert_eq!(summary.count(VerdictKind::AmountExceedsLimit), 1);
    assert_eq!(sink.executed(), 1);
}

// ============================================================================
// Fee snapshots
// ============================================================================

#[test]
fn test_fluctuating_fee_blocks_only_during_spike() {
    let guard = Guard::new(reference_engine(), ScriptedFeeEstimator::from_gwei(&[30, 90, 30]));
    let proposal = TransactionProposal::new(WHITELISTED, milli_eth(500));
    let mut source = ScenarioSource::new(vec![proposal.clone(), proposal.clone(), proposal]);
    let mut sink = RecordingSink::new();

    let summary = guard.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(summary.authorized, 2);
    assert_eq!(summary.count(VerdictKind::FeeTooHigh), 1);
    assert_eq!(sink.executed().len(), 2);
}

#[test]
fn test_fee_failure_skips_without_executing() {
    let guard = Guard::new(reference_engine(), fixed(30)).with_fee_timeout(Duration::ZERO);
    let mut sink = RecordingSink::new();

    let summary = guard
        .run(&mut ScenarioSource::new(reference_scenarios()), &mut sink, None)
        .unwrap();

    assert_eq!(summary.skipped, 5);
    assert_eq!(summary.evaluated, 0);
    assert!(sink.executed().is_empty());
}

#[test]
fn test_process_reports_fee_failure() {
    let guard = Guard::new(reference_engine(), ScriptedFeeEstimator::new([]));
    let err = guard
        .process(&TransactionProposal::new(WHITELISTED, milli_eth(1)), &mut RecordingSink::new())
        .unwrap_err();

    assert!(matches!(err, GuardError::Fee { ref destination, .. } if destination == WHITELISTED));
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_malformed_json_line_is_skipped() {
    let input = format!(
        "{}not json\n{{\"destination\": \"{WHITELISTED}\", \"amount\": \"0.5\"}}\n",
        reference_scenarios_jsonl()
    );
    let guard = Guard::new(reference_engine(), fixed(30));
    let mut sink = RecordingSink::new();

    let summary = guard
        .run(&mut JsonLinesSource::new(Cursor::new(input)), &mut sink, None)
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.evaluated, 6);
    // The proposal after the bad line still reached the sink.
    assert_eq!(sink.executed().len(), 3);
}

#[test]
fn test_limit_stops_an_endless_source() {
    let guard = Guard::new(reference_engine(), fixed(30));
    let mut source = ScenarioSource::new(reference_scenarios()).cycle();

    let summary = guard.run(&mut source, &mut RecordingSink::new(), Some(23)).unwrap();

    assert_eq!(summary.evaluated, 23);
    assert!(source.next_proposal().unwrap().is_some());
}

// ============================================================================
// Shared engine
// ============================================================================

#[test]
fn test_policy_swap_between_proposals() {
    let shared = SharedPolicyEngine::from_engine(reference_engine());
    let proposal = TransactionProposal::new(STRANGER, milli_eth(200));
    let fee = FeeEstimate::from_gwei(30);

    assert_eq!(
        shared.evaluate(&proposal, fee).kind,
        VerdictKind::DestinationNotWhitelisted
    );

    let widened = shared
        .snapshot()
        .config()
        .clone()
        .with_whitelist(vec![WHITELISTED.to_string(), STRANGER.to_string()]);
    shared.replace(widened).unwrap();

    assert_eq!(shared.evaluate(&proposal, fee).kind, VerdictKind::Verified);
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = Arc::new(reference_engine());
    let fee = FeeEstimate::from_gwei(30);

    let handles: Vec<_> = reference_scenarios()
        .into_iter()
        .map(|proposal| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.evaluate(&proposal, fee).kind)
        })
        .collect();

    let kinds: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(kinds.iter().filter(|k| **k == VerdictKind::Verified).count(), 2);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn blocked_proposals_never_reach_the_sink(
        destinations in prop::collection::vec(
            prop_oneof![ethereum_address(), Just("0xScamAddress888".to_string())],
            1..20,
        ),
        amounts in prop::collection::vec(0u64..5_000, 20),
        fees in prop::collection::vec(0u64..120, 1..8),
    ) {
        let proposals: Vec<_> = destinations
            .iter()
            .zip(&amounts)
            .map(|(d, a)| TransactionProposal::new(d.clone(), milli_eth(*a)))
            .collect();

        let guard = Guard::new(reference_engine(), ScriptedFeeEstimator::from_gwei(&fees));
        let mut sink = RecordingSink::new();
        let summary = guard
            .run(&mut ScenarioSource::new(proposals.clone()), &mut sink, None)
            .unwrap();

        prop_assert_eq!(summary.evaluated, proposals.len());
        prop_assert_eq!(summary.authorized + summary.blocked, summary.evaluated);
        prop_assert_eq!(sink.executed().len(), summary.authorized);

        // One fee per proposal, in script order.
        let engine = reference_engine();
        let expected = proposals
            .iter()
            .zip(fees.iter().cycle())
            .filter(|(p, fee)| engine.evaluate(p, FeeEstimate::from_gwei(**fee)).authorized)
            .count();
        prop_assert_eq!(summary.authorized, expected);
    }
}
