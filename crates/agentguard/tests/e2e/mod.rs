//! End-to-end tests for the guard loop and the command flow.

pub mod config_test;
pub mod guard_test;
