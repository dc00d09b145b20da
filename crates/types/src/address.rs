use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The length in bytes of a Sui address or object id.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Sui address.
///
/// Sui uses the same format for account addresses and object ids, so [`ObjectId`] is an alias of
/// this type. Short forms such as `0x2` are accepted and left-padded with zeros.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

/// The id of an on-chain object.
pub type ObjectId = Address;

/// An error returned when parsing an [`Address`] from a string.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than 32 bytes: {0}")]
    TooLong(String),
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
}

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the address.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns the abbreviated form used in page headers, e.g. `0x1a2b...9f0e`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}...{}", &full[..4], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressError::TooLong(s.to_string()));
        }

        let padded = format!("{digits:0>width$}", width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let s = "0x4947d5d6d7c6cd338491732b163a55fb29f099ba69b819a99f99e3b76e37cab3";
        let address = Address::from_str(s).unwrap();
        assert_eq!(address.to_string(), s);
    }

    #[test]
    fn test_parse_short_address_is_padded() {
        let address = Address::from_str("0x2").unwrap();
        assert_eq!(address.as_bytes()[31], 2);
        assert!(address.as_bytes()[..31].iter().all(|b| *b == 0));
        assert_eq!(
            address.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Address::from_str("0x"), Err(AddressError::Empty));
        assert!(matches!(Address::from_str("0xzz"), Err(AddressError::InvalidHex(_))));
        let too_long = format!("0x{}", "a".repeat(65));
        assert!(matches!(Address::from_str(&too_long), Err(AddressError::TooLong(_))));
    }

    #[test]
    fn test_short_form() {
        let address = Address::from_str(
            "0x1a2b000000000000000000000000000000000000000000000000000000009f0e",
        )
        .unwrap();
        assert_eq!(address.short(), "0x1a2b...9f0e");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let address = Address::from_str("0x6").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000006\""
        );
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
