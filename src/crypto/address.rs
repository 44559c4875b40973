//! Ethereum address representation and utilities.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use crate::error::Error;

/// An Ethereum address (20 bytes).
///
/// Displays as lower-case `0x`-prefixed hex, the canonical form used when
/// comparing predicted and observed addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice, which must be exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| Error::InvalidInputLength {
            what: "address",
            expected: 20,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the address with 0x prefix.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Returns the address with checksum encoding (EIP-55).
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let mut hasher = Keccak::v256();
        hasher.update(hex_addr.as_bytes());
        let mut hash = [0u8; 32];
        hasher.finalize(&mut hash);

        let mut checksum = String::with_capacity(42);
        checksum.push_str("0x");

        for (i, c) in hex_addr.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let hash_nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };

            if hash_nibble >= 8 {
                checksum.push(c.to_ascii_uppercase());
            } else {
                checksum.push(c);
            }
        }

        checksum
    }

    /// Left-pads the address into a 32-byte ABI word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Parses 40 hex digits, with or without `0x`, in any case. The checksum is
    /// not enforced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let h = s.strip_prefix("0x").unwrap_or(s);
        if h.len() != 40 {
            return Err(Error::InvalidInputLength {
                what: "address",
                expected: 20,
                actual: h.len() / 2,
            });
        }
        let bytes = hex::decode(h).map_err(|e| Error::MalformedHex {
            what: "address",
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(addr: alloy_primitives::Address) -> Self {
        Self(addr.into())
    }
}

impl From<Address> for alloy_primitives::Address {
    fn from(addr: Address) -> Self {
        alloy_primitives::Address::new(addr.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_prefixed())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_address() {
        // Test vector from EIP-55
        let addr: Address = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_display_is_lowercase() {
        let addr: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        assert_eq!(addr.to_string(), "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(addr.to_string().len(), 42);
    }

    #[test]
    fn test_hex_output() {
        let addr = Address::ZERO;
        assert_eq!(addr.to_hex(), "0000000000000000000000000000000000000000");
        assert_eq!(
            addr.to_hex_prefixed(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(Error::InvalidInputLength { what: "address", .. })
        ));
        assert!(matches!(
            "zz00000000000000000000000000000000000000".parse::<Address>(),
            Err(Error::MalformedHex { .. })
        ));
    }

    #[test]
    fn test_word_padding() {
        let addr: Address = "303de46de694cc75a2f66da93ac86c6a6eee607e".parse().unwrap();
        let word = addr.to_word();
        assert_eq!(word[..12], [0u8; 12]);
        assert_eq!(&word[12..], addr.as_bytes());
    }

    #[test]
    fn test_alloy_round_trip() {
        let addr: Address = "303de46de694cc75a2f66da93ac86c6a6eee607e".parse().unwrap();
        let other: alloy_primitives::Address = addr.into();
        assert_eq!(Address::from(other), addr);
    }
}
