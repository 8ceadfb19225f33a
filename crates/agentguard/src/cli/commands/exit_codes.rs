//! Exit codes shared by every command.

/// Successful operation; for `check`, the proposal was authorized.
pub const EXIT_SUCCESS: i32 = 0;

/// The policy blocked the proposal.
pub const EXIT_BLOCKED: i32 = 1;

/// General error (configuration, I/O, invalid input, etc.).
pub const EXIT_ERROR: i32 = 2;
