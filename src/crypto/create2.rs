//! Contract address derivation.
//!
//! Matches the EVM's own computation:
//!   CREATE2: keccak256(0xff || deployer || salt || keccak256(initCode))[12:32]
//!   CREATE:  keccak256(rlp([sender, nonce]))[12:32]

use tracing::debug;

use super::{keccak256, Address};
use crate::error::{Error, Result};

/// Computes the CREATE2 address.
/// Preimage: 0xff (1) || deployer (20) || salt (32) || init_code_hash (32) = 85 bytes.
/// Address = keccak256(preimage)[12..32].
pub fn create2_address(
    deployer: &[u8; 20],
    salt: &[u8; 32],
    init_code_hash: &[u8; 32],
) -> [u8; 20] {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer);
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    addr
}

/// Length-checked CREATE2 derivation over untyped input, hashing `init_code`.
pub fn compute_create2_address(deployer: &[u8], salt: &[u8], init_code: &[u8]) -> Result<Address> {
    let deployer: &[u8; 20] = deployer.try_into().map_err(|_| Error::InvalidInputLength {
        what: "deployer address",
        expected: 20,
        actual: deployer.len(),
    })?;
    let salt: &[u8; 32] = salt.try_into().map_err(|_| Error::InvalidInputLength {
        what: "salt",
        expected: 32,
        actual: salt.len(),
    })?;

    let init_code_hash = keccak256(init_code);
    let address = Address::from_bytes(create2_address(deployer, salt, &init_code_hash));
    debug!(
        deployer = %hex::encode(deployer),
        salt = %hex::encode(salt),
        init_code_hash = %hex::encode(init_code_hash),
        %address,
        "derived CREATE2 address"
    );
    Ok(address)
}

/// Computes the address of a contract created by `sender` at `nonce`.
pub fn create_address(sender: &Address, nonce: u64) -> Address {
    Address::from(alloy_primitives::Address::from(*sender).create(nonce))
}
