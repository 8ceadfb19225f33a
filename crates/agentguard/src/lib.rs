//! # `AgentGuard`
//!
//! A deterministic guard between an autonomous agent that proposes transfers
//! and the channel that executes them.
//!
//! The agent is trusted to be creative, not correct. Every proposal passes
//! through a fixed policy (address format, transaction limit, fee ceiling,
//! whitelist) before anything irreversible happens, and every verdict is
//! logged.
//!
//! ## Modules
//!
//! - [`guard`] - [`Guard`], the source and sink traits, and run summaries
//! - [`sources`] - Scenario and JSON-lines proposal sources
//! - [`sinks`] - Dry-run and recording execution sinks
//! - [`logging`] - `tracing` setup and verdict events
//! - [`cli`] - Command-line interface definitions and handlers
//!
//! ## Usage
//!
//! ```
//! use agentguard::{Guard, RecordingSink, ScenarioSource, DEMO_WHITELIST};
//! use agentguard_core::PolicyConfig;
//! use agentguard_policy::{DefaultPolicyEngine, ScriptedFeeEstimator};
//!
//! let policy = PolicyConfig::new()
//!     .with_whitelist(DEMO_WHITELIST.iter().map(ToString::to_string).collect());
//! let guard = Guard::new(
//!     DefaultPolicyEngine::new(policy).unwrap(),
//!     ScriptedFeeEstimator::from_gwei(&[30]),
//! );
//!
//! let mut sink = RecordingSink::new();
//! let summary = guard.run(&mut ScenarioSource::builtin(), &mut sink, None).unwrap();
//!
//! assert_eq!(summary.evaluated, 4);
//! assert_eq!(summary.authorized, 1);
//! assert_eq!(sink.executed().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod guard;
pub mod logging;
pub mod sinks;
pub mod sources;

pub use guard::{
    ExecutionError, ExecutionReceipt, ExecutionSink, Guard, GuardError, ProcessOutcome,
    ProposalSource, RunSummary, SourceError,
};
pub use sinks::{DryRunSink, RecordingSink};
pub use sources::{builtin_scenarios, JsonLinesSource, ScenarioSource, DEMO_WHITELIST};

// Re-export key logging types for convenience
pub use logging::{
    init_logging, log_verdict_event, new_correlation_id, verbosity_to_level, LogConfig, LogError,
    LogFormat, LogGuard, LogLevel,
};
