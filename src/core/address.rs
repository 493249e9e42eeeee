//! core::address
//!
//! Account addresses as they appear in wearer and claims-hatter lookups.
//!
//! Addresses are normalized to lowercase, which is how the graph index
//! keys its entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex digits in an address (excluding `0x`).
const ADDRESS_HEX_DIGITS: usize = 40;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid address '{0}': expected 0x followed by 40 hex digits")]
pub struct AddressError(pub String);

/// A 20-byte account address.
///
/// # Example
///
/// ```
/// use hatwork::core::address::Address;
///
/// let addr = Address::new("0xABCDEFabcdef0123456789012345678901234567").unwrap();
/// assert_eq!(addr.as_str(), "0xabcdefabcdef0123456789012345678901234567");
///
/// assert!(Address::new("0x1234").is_err());
/// assert!(Address::new("abcdefabcdef0123456789012345678901234567").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create a validated address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError` unless the input is `0x` + 40 hex digits.
    pub fn new(addr: impl Into<String>) -> Result<Self, AddressError> {
        let addr = addr.into();
        let valid = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .is_some_and(|digits| {
                digits.len() == ADDRESS_HEX_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
            });
        if !valid {
            return Err(AddressError(addr));
        }
        Ok(Self(format!("0x{}", addr[2..].to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_prefix_and_case() {
        let addr = Address::new("0XAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();
        assert_eq!(addr.as_str(), "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    }

    #[test]
    fn rejects_wrong_length_or_digits() {
        assert!(Address::new("").is_err());
        assert!(Address::new("0x").is_err());
        assert!(Address::new(format!("0x{}", "a".repeat(41))).is_err());
        assert!(Address::new(format!("0x{}", "g".repeat(40))).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let addr = Address::new(format!("0x{}", "1".repeat(40))).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }
}
