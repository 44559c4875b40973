//! Salt normalization.
//!
//! Every salt resolves to the 32 bytes the factory passes to CREATE2. Two salts
//! with the same 32 bytes are the same salt, whatever variant they started as.

use std::fmt;
use std::hash::{Hash, Hasher};

use alloy_primitives::U256;
use rand::RngCore;

use crate::crypto::keccak256;
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub enum Salt {
    /// Big-endian, left-padded to 32 bytes.
    Integer(U256),
    /// Used verbatim.
    Raw([u8; 32]),
    /// Hashed with keccak256 over its UTF-8 bytes.
    Opaque(String),
}

impl Salt {
    /// Classifies untyped string input.
    ///
    /// A hex literal (`0x` optional) of up to 64 digits is taken as raw bytes,
    /// left-padded. Longer hex literals cannot fit and are rejected. Anything
    /// else, including the empty string and a bare `0x`, is an opaque string.
    pub fn from_text(input: &str) -> Result<Self> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Salt::Opaque(input.to_string()));
        }
        if digits.len() > 64 {
            return Err(Error::InvalidSalt(format!(
                "hex salt has {} digits, at most 64 fit in 32 bytes",
                digits.len()
            )));
        }

        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| Error::InvalidSalt(e.to_string()))?;
        Ok(Salt::Raw(bytes))
    }

    /// Parses a non-negative decimal integer below 2^256.
    pub fn from_decimal(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.starts_with('-') {
            return Err(Error::InvalidSalt(format!("negative integer salt {input}")));
        }
        if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidSalt(format!("not a decimal integer: {input:?}")));
        }
        U256::from_str_radix(input, 10)
            .map(Salt::Integer)
            .map_err(|_| Error::InvalidSalt(format!("integer salt {input} exceeds 32 bytes")))
    }

    /// A fresh random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Salt::Raw(bytes)
    }

    /// The canonical 32-byte form.
    pub fn to_bytes(&self) -> [u8; 32] {
        match self {
            Salt::Integer(value) => value.to_be_bytes::<32>(),
            Salt::Raw(bytes) => *bytes,
            Salt::Opaque(text) => keccak256(text.as_bytes()),
        }
    }

    /// `0x` followed by 64 lower-case hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl PartialEq for Salt {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Salt {}

impl Hash for Salt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<u64> for Salt {
    fn from(value: u64) -> Self {
        Salt::Integer(U256::from(value))
    }
}

impl From<u128> for Salt {
    fn from(value: u128) -> Self {
        Salt::Integer(U256::from(value))
    }
}

impl From<U256> for Salt {
    fn from(value: U256) -> Self {
        Salt::Integer(value)
    }
}

impl From<[u8; 32]> for Salt {
    fn from(bytes: [u8; 32]) -> Self {
        Salt::Raw(bytes)
    }
}

/// Always opaque, even for hex-looking text; see [`Salt::from_text`].
impl From<&str> for Salt {
    fn from(text: &str) -> Self {
        Salt::Opaque(text.to_string())
    }
}

impl TryFrom<i64> for Salt {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Salt::from)
            .map_err(|_| Error::InvalidSalt(format!("negative integer salt {value}")))
    }
}
