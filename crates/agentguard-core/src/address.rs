//! Destination address format and validated addresses.
//!
//! Proposals arrive with a raw destination string that may have been made up
//! by the agent. [`AddressFormat`] describes what a well-formed destination
//! looks like (prefix, exact length, hex body) and [`Address`] is a destination
//! that has passed that check.
//!
//! # Examples
//!
//! ```
//! use agentguard_core::address::{Address, AddressFormat};
//!
//! let format = AddressFormat::evm();
//! assert!(format.is_well_formed("0x1234567890abcdef1234567890abcdef12345678"));
//! assert!(!format.is_well_formed("0xScamAddress888"));
//!
//! let a = Address::parse("0xABCDEF1234567890ABCDEF1234567890ABCDEF12", &format).unwrap();
//! let b = Address::parse("0xabcdef1234567890abcdef1234567890abcdef12", &format).unwrap();
//! assert_eq!(a, b);
//! ```

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of an EVM address.
pub const EVM_ADDRESS_PREFIX: &str = "0x";

/// Total length of an EVM address including the prefix.
pub const EVM_ADDRESS_LENGTH: usize = 42;

fn default_prefix() -> String {
    EVM_ADDRESS_PREFIX.to_string()
}

const fn default_length() -> usize {
    EVM_ADDRESS_LENGTH
}

const fn default_require_hex() -> bool {
    true
}

/// The syntactic rule every destination must satisfy.
///
/// Defaults to the EVM convention: `0x` followed by 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFormat {
    /// Required prefix (case-sensitive).
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Exact total length in bytes, prefix included.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Whether the part after the prefix must be hexadecimal.
    #[serde(default = "default_require_hex")]
    pub require_hex: bool,
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self::evm()
    }
}

impl AddressFormat {
    /// The EVM address convention (`0x` + 40 hex digits).
    #[must_use]
    pub fn evm() -> Self {
        Self {
            prefix: default_prefix(),
            length: default_length(),
            require_hex: default_require_hex(),
        }
    }

    /// Checks the raw string against this format.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidAddress`] naming the first rule violated:
    /// prefix, then length, then hex body.
    pub fn validate(&self, raw: &str) -> Result<(), ParseError> {
        let Some(body) = raw.strip_prefix(self.prefix.as_str()) else {
            return Err(ParseError::invalid_address(
                raw,
                format!("missing {:?} prefix", self.prefix),
            ));
        };

        if raw.len() != self.length {
            return Err(ParseError::invalid_address(
                raw,
                format!("expected {} characters, got {}", self.length, raw.len()),
            ));
        }

        if self.require_hex && !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseError::invalid_address(raw, "body is not hexadecimal"));
        }

        Ok(())
    }

    /// Returns `true` if the raw string satisfies this format.
    #[must_use]
    pub fn is_well_formed(&self, raw: &str) -> bool {
        self.validate(raw).is_ok()
    }

    /// Checks that the format itself can accept at least one address.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the length leaves no room
    /// for a body after the prefix.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.length <= self.prefix.len() {
            return Err(format!(
                "address length {} leaves no room after prefix {:?}",
                self.length, self.prefix
            ));
        }
        Ok(())
    }
}

/// A destination that passed [`AddressFormat::validate`].
///
/// Stored lowercased so that comparisons ignore checksum casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validates and normalizes a raw destination.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidAddress`] if `raw` does not match `format`.
    pub fn parse(raw: &str, format: &AddressFormat) -> Result<Self, ParseError> {
        format.validate(raw)?;
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// The normalized (lowercase) address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
