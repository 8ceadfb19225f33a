//! Decimal amount parsing and formatting.
//!
//! Every quantity inside `AgentGuard` is a [`U256`] in the smallest unit of the
//! chain: wei for transfer amounts and wei-per-gas for fees. Humans and agents
//! write amounts as decimal strings in ether (`"1.5"`) and fees in gwei
//! (`"30"`); this module converts between the two representations.
//!
//! # Examples
//!
//! ```
//! use agentguard_core::amount::{format_ether_amount, parse_ether_amount, parse_gwei_amount};
//! use alloy_primitives::U256;
//!
//! let half = parse_ether_amount("0.5").unwrap();
//! assert_eq!(half, U256::from(500_000_000_000_000_000u64));
//! assert_eq!(format_ether_amount(half), "0.5");
//!
//! let fee = parse_gwei_amount("30").unwrap();
//! assert_eq!(fee, U256::from(30_000_000_000u64));
//!
//! assert!(parse_ether_amount("-1").is_err());
//! ```

use crate::error::ParseError;
use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

/// One ether in wei.
pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// One gwei in wei.
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Parses a decimal ether string into wei.
///
/// # Errors
///
/// Returns [`ParseError::InvalidAmount`] for empty or negative input, non-numeric
/// input, or more than 18 fractional digits.
pub fn parse_ether_amount(raw: &str) -> Result<U256, ParseError> {
    parse_decimal(raw, "ether", 18)
}

/// Parses a decimal gwei string into wei.
///
/// # Errors
///
/// Returns [`ParseError::InvalidAmount`] for empty or negative input, non-numeric
/// input, or more than 9 fractional digits.
pub fn parse_gwei_amount(raw: &str) -> Result<U256, ParseError> {
    parse_decimal(raw, "gwei", 9)
}

/// Formats wei as a trimmed decimal ether string (`"1.5"`, `"0.1"`, `"2"`).
#[must_use]
pub fn format_ether_amount(wei: U256) -> String {
    format_decimal(wei, "ether")
}

/// Formats wei as a trimmed decimal gwei string.
#[must_use]
pub fn format_gwei_amount(wei: U256) -> String {
    format_decimal(wei, "gwei")
}

fn parse_decimal(raw: &str, unit: &str, decimals: usize) -> Result<U256, ParseError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ParseError::invalid_amount(raw, "empty amount"));
    }
    if trimmed.starts_with('-') {
        return Err(ParseError::invalid_amount(raw, "amount must not be negative"));
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals {
            return Err(ParseError::invalid_amount(
                raw,
                format!("more than {decimals} fractional digits for {unit}"),
            ));
        }
    }

    parse_units(trimmed, unit)
        .map(|units| units.get_absolute())
        .map_err(|e| ParseError::invalid_amount(raw, e.to_string()))
}

fn format_decimal(wei: U256, unit: &str) -> String {
    match format_units(wei, unit) {
        Ok(formatted) => trim_fraction(&formatted),
        Err(_) => format!("{wei} wei"),
    }
}

fn trim_fraction(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Accepts `"1.5"`, `1.5` or `2` for an amount field.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Integer(u64),
    Float(f64),
}

impl RawAmount {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

/// Serde adapter for [`U256`] fields written as decimal ether.
///
/// ```
/// use agentguard_core::amount;
/// use alloy_primitives::U256;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Limit {
///     #[serde(with = "amount::ether")]
///     max: U256,
/// }
///
/// let limit: Limit = serde_json::from_str(r#"{"max": "1.5"}"#).unwrap();
/// assert_eq!(limit.max, U256::from(1_500_000_000_000_000_000u64));
/// assert_eq!(serde_json::to_string(&limit).unwrap(), r#"{"max":"1.5"}"#);
/// ```
pub mod ether {
    use super::{format_ether_amount, parse_ether_amount, RawAmount};
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes wei as a decimal ether string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_ether_amount(*value))
    }

    /// Deserializes a decimal ether string or number into wei.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a valid non-negative ether amount.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAmount::deserialize(deserializer)?.into_text();
        parse_ether_amount(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for [`U256`] fields written as decimal gwei.
pub mod gwei {
    use super::{format_gwei_amount, parse_gwei_amount, RawAmount};
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes wei as a decimal gwei string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_gwei_amount(*value))
    }

    /// Deserializes a decimal gwei string or number into wei.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a valid non-negative gwei amount.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAmount::deserialize(deserializer)?.into_text();
        parse_gwei_amount(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional [`U256`] fields written as decimal gwei.
///
/// TOML has no null, so `None` is written as the string `"off"`. Reading
/// accepts `"off"` (any case) or an explicit null as `None`.
pub mod option_gwei {
    use super::{format_gwei_amount, parse_gwei_amount, RawAmount};
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Marker for a disabled value.
    pub const OFF: &str = "off";

    /// Serializes `Some(wei)` as a decimal gwei string and `None` as `"off"`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&format_gwei_amount(*v)),
            None => serializer.serialize_str(OFF),
        }
    }

    /// Deserializes `"off"`, null, or a decimal gwei string or number.
    ///
    /// # Errors
    ///
    /// Fails if a present value is neither `"off"` nor a valid non-negative
    /// gwei amount.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawAmount>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawAmount::Text(text)) if text.trim().eq_ignore_ascii_case(OFF) => Ok(None),
            Some(raw) => parse_gwei_amount(&raw.into_text())
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
