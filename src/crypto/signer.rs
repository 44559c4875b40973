//! Local secp256k1 signing key and its Ethereum address.

use secp256k1::{PublicKey, Secp256k1, SecretKey};

use super::{keccak256, Address};
use crate::error::{Error, Result};

/// A secp256k1 key held in memory, used to send the factory bootstrap transaction.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalSigner {
    secret_key: SecretKey,
    address: Address,
}

impl LocalSigner {
    /// Generates a new random signer.
    pub fn random() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut rand::thread_rng());
        let address = Self::derive_address(&public_key);
        Self { secret_key, address }
    }

    /// Builds a signer from a 32-byte secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self> {
        let secp = Secp256k1::new();
        let secret_key =
            SecretKey::from_slice(&secret_bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        let address = Self::derive_address(&public_key);
        Ok(Self { secret_key, address })
    }

    /// Builds a signer from a hex secret key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self> {
        let h = key.trim().strip_prefix("0x").unwrap_or(key.trim());
        let bytes = hex::decode(h).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| Error::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;
        Self::from_secret_key(bytes)
    }

    /// Last 20 bytes of keccak256 over the uncompressed public key without its
    /// 0x04 prefix.
    fn derive_address(public_key: &PublicKey) -> Address {
        let public_key_bytes = public_key.serialize_uncompressed();
        let hash = keccak256(&public_key_bytes[1..]);

        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&hash[12..]);
        Address::from_bytes(address_bytes)
    }

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[cfg(test)]
    fn secret_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
