//! Integration tests for the init -> config -> check flow.
//!
//! Every command is pointed at a file inside a temporary directory with an
//! explicit `--config` path, so nothing touches the real home directory.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use agentguard::cli::commands::exit_codes::{EXIT_BLOCKED, EXIT_ERROR};
use agentguard::cli::commands::{
    CheckCommand, CheckCommandError, ConfigCommand, DemoCommand, InitCommand, InitError,
    RunCommand,
};
use agentguard::cli::{CheckArgs, Cli, Commands, OutputFormat, RunArgs};
use agentguard_core::config::Config;
use agentguard_core::types::VerdictKind;
use agentguard_core::ConfigLoader;
use clap::Parser;

use crate::common::{
    reference_scenarios_jsonl, temp_data_dir, write_reference_config, STRANGER, WHITELISTED,
};

fn check_args(to: &str, amount: &str) -> CheckArgs {
    CheckArgs {
        destination: to.to_string(),
        amount: amount.to_string(),
        fee_gwei: None,
        format: OutputFormat::Json,
    }
}

// ============================================================================
// init
// ============================================================================

#[test]
fn test_init_then_load_defaults() {
    let dir = temp_data_dir();
    let path = dir.path().join(".agentguard").join("config.toml");

    InitCommand::new(false, Some(path.clone())).run().unwrap();

    assert_eq!(ConfigLoader::load_from(&path).unwrap(), Config::default());
    assert!(matches!(
        InitCommand::new(false, Some(path.clone())).run(),
        Err(InitError::AlreadyInitialized(_))
    ));
    InitCommand::new(true, Some(path)).run().unwrap();
}

#[test]
fn test_base_dir_loader_sees_initialized_file() {
    let dir = temp_data_dir();
    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
    assert!(!loader.exists());

    InitCommand::new(false, Some(loader.config_path())).run().unwrap();

    assert!(loader.exists());
    assert_eq!(loader.load_required().unwrap(), Config::default());
}

// ============================================================================
// init -> edit -> check
// ============================================================================

#[test]
fn test_edited_whitelist_changes_verdicts() {
    let dir = temp_data_dir();
    let path: PathBuf = dir.path().join("config.toml");
    InitCommand::new(false, Some(path.clone())).run().unwrap();

    let before = CheckCommand::new(check_args(STRANGER, "0.5"), Some(path.clone()))
        .evaluate()
        .unwrap();
    assert_eq!(before.verdict.kind, VerdictKind::DestinationNotWhitelisted);

    let mut config = ConfigLoader::load_from(&path).unwrap();
    config.policy.whitelist.push(STRANGER.to_uppercase().replacen("0X", "0x", 1));
    fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

    let after = CheckCommand::new(check_args(STRANGER, "0.5"), Some(path))
        .evaluate()
        .unwrap();
    assert_eq!(after.verdict.kind, VerdictKind::Verified);
}

#[test]
fn test_check_exit_codes() {
    let dir = temp_data_dir();
    let path = write_reference_config(dir.path());

    CheckCommand::new(check_args(WHITELISTED, "0.5"), Some(path.clone()))
        .run()
        .unwrap();

    let blocked = CheckCommand::new(check_args("0xScamAddress888", "10.0"), Some(path.clone()))
        .run()
        .unwrap_err();
    assert!(matches!(blocked, CheckCommandError::Blocked { ref rule, .. } if rule == "address_format"));
    assert_eq!(blocked.exit_code(), EXIT_BLOCKED);

    let invalid = CheckCommand::new(check_args(WHITELISTED, "lots"), Some(path))
        .run()
        .unwrap_err();
    assert_eq!(invalid.exit_code(), EXIT_ERROR);
}

#[test]
fn test_config_render_reflects_file() {
    let dir = temp_data_dir();
    let path = write_reference_config(dir.path());

    let rendered = ConfigCommand::new(None, Some(path)).render().unwrap();

    assert!(rendered.contains(WHITELISTED));
    assert!(rendered.contains("max_transaction_amount = \"1.5\""));
    assert!(rendered.contains("# checks: address_format -> tx_limit -> fee_ceiling -> whitelist"));
}

// ============================================================================
// run and demo
// ============================================================================

#[test]
fn test_run_reads_jsonl_file() {
    let dir = temp_data_dir();
    let config = write_reference_config(dir.path());
    let input = dir.path().join("proposals.jsonl");
    fs::write(&input, reference_scenarios_jsonl()).unwrap();

    let args = RunArgs {
        input,
        fee_gwei: None,
        limit: None,
        format: OutputFormat::Json,
    };
    RunCommand::new(args.clone(), Some(config.clone())).run().unwrap();

    let summary = RunCommand::new(args, Some(config))
        .run_with_reader(Cursor::new(reference_scenarios_jsonl()))
        .unwrap();
    assert_eq!(summary.authorized, 2);
    assert_eq!(summary.blocked, 3);
}

#[test]
fn test_demo_with_reference_config() {
    let dir = temp_data_dir();
    let config = write_reference_config(dir.path());
    let mut out = Vec::new();

    // The configured whitelist is used as-is, not the demo addresses.
    let summary = DemoCommand::new(Some(4), Some(config)).play(&mut out).unwrap();

    assert_eq!(summary.evaluated, 4);
    assert_eq!(summary.count(VerdictKind::MalformedAddress), 1);
    assert_eq!(summary.count(VerdictKind::AmountExceedsLimit), 1);
    assert_eq!(summary.count(VerdictKind::DestinationNotWhitelisted), 1);
    assert_eq!(summary.count(VerdictKind::Verified), 1);
}

// ============================================================================
// CLI parsing
// ============================================================================

#[test]
fn test_cli_dispatch_shapes() {
    let cli = Cli::try_parse_from([
        "agentguard",
        "--config",
        "/tmp/agentguard.toml",
        "check",
        "--to",
        WHITELISTED,
        "--amount",
        "0.5",
    ])
    .expect("should parse");

    assert_eq!(cli.config, Some(PathBuf::from("/tmp/agentguard.toml")));
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.destination, WHITELISTED);
            assert_eq!(args.format, OutputFormat::Text);
        }
        other => panic!("expected check, got {other:?}"),
    }

    assert!(Cli::try_parse_from(["agentguard", "sign"]).is_err());
}
