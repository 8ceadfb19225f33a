//! Error types for the `AgentGuard` policy guard.
//!
//! A blocked proposal is never an error: the policy engine always answers with a
//! [`Verdict`](crate::types::Verdict). The types here cover everything around
//! that decision, organized by domain:
//!
//! - [`ParseError`] - Untrusted input (addresses, amounts, proposals) could not be read
//! - [`PolicyError`] - The policy configuration is unusable (construction time only)
//! - [`ConfigError`] - Configuration files could not be loaded or are invalid
//! - [`FeeError`] - The fee-estimation capability could not produce an estimate
//! - [`AgentGuardError`] - Top-level error that wraps all error types
//!
//! # Example
//!
//! ```rust
//! use agentguard_core::error::{AgentGuardError, ParseError};
//!
//! fn read_amount(raw: &str) -> Result<(), AgentGuardError> {
//!     if raw.is_empty() {
//!         return Err(ParseError::invalid_amount(raw, "empty amount").into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(read_amount("").is_err());
//! ```

/// Top-level error type for the `AgentGuard` service.
///
/// This enum wraps all domain-specific error types and provides
/// automatic conversion via the `#[from]` attribute.
#[derive(Debug, thiserror::Error)]
pub enum AgentGuardError {
    /// Input parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The policy configuration was rejected.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fee estimation failed.
    #[error("Fee estimation error: {0}")]
    Fee(#[from] FeeError),
}

// ============================================================================
// ParseError
// ============================================================================

/// Errors that can occur while reading untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The address does not follow the configured format.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// The malformed address string.
        address: String,
        /// Which part of the format was violated.
        reason: String,
    },

    /// The amount string is not a valid non-negative decimal quantity.
    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount {
        /// The raw amount string.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The proposal document could not be decoded.
    #[error("invalid proposal: {context}")]
    InvalidProposal {
        /// Context about what was malformed.
        context: String,
    },
}

impl ParseError {
    /// Create an `InvalidAddress` error.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an `InvalidAmount` error.
    #[must_use]
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an `InvalidProposal` error with context.
    #[must_use]
    pub fn invalid_proposal(context: impl Into<String>) -> Self {
        Self::InvalidProposal {
            context: context.into(),
        }
    }
}

// ============================================================================
// PolicyError
// ============================================================================

/// Errors raised while building a policy engine.
///
/// These never occur per proposal. A configuration that passes
/// [`PolicyConfig::validate`](crate::config::PolicyConfig::validate) cannot
/// produce one later.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The policy configuration is invalid.
    #[error("invalid configuration: {context}")]
    InvalidConfiguration {
        /// Context about what is invalid.
        context: String,
    },
}

impl PolicyError {
    /// Create an `InvalidConfiguration` error.
    #[must_use]
    pub fn invalid_configuration(context: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            context: context.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// The invalid value.
        value: String,
    },

    /// Reading or writing a configuration file failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an `Io` error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }
}

impl From<PolicyError> for ConfigError {
    fn from(error: PolicyError) -> Self {
        Self::parse_failed(format!("policy validation failed: {error}"))
    }
}

// ============================================================================
// FeeError
// ============================================================================

/// Errors returned by a fee-estimation capability.
///
/// A fee error means no verdict was produced for the proposal. The caller may
/// retry later with a fresh estimate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    /// The estimator did not answer within the allowed time.
    #[error("fee estimate timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The estimator has no estimate to give.
    #[error("fee estimate unavailable: {reason}")]
    Unavailable {
        /// Why no estimate is available.
        reason: String,
    },
}

impl FeeError {
    /// Create a `Timeout` error.
    #[must_use]
    pub const fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Create an `Unavailable` error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`AgentGuardError`] as the error type.
pub type Result<T> = std::result::Result<T, AgentGuardError>;

/// A `Result` type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Unit Tests
// ============================================================================
