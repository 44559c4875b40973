//! Hashing, addresses and the contract address derivations.
//!
//! - CREATE2: address = keccak256(0xff || deployer || salt || keccak256(initCode))[12..32]
//! - CREATE:  address = keccak256(rlp([sender, nonce]))[12..32]

mod address;
pub mod create2;
mod signer;

pub use address::Address;
pub use create2::{compute_create2_address, create2_address, create_address};
pub use signer::LocalSigner;

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
