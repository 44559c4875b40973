//! Error kinds for salt normalization, init code assembly, address derivation
//! and factory deployments.

use crate::chain::ProviderError;
use crate::crypto::Address;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    #[error("constructor argument encoding failed: {0}")]
    Encoding(String),

    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidInputLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed {what} hex: {reason}")]
    MalformedHex { what: &'static str, reason: String },

    #[error("invalid secret key: {0}")]
    InvalidKey(String),

    #[error("deployment failed: {0}")]
    DeploymentFailed(String),

    #[error("no Deployed event in transaction 0x{}", hex::encode(.tx_hash))]
    EventNotFound { tx_hash: [u8; 32] },

    /// The factory deployed somewhere other than the locally derived address.
    #[error("address mismatch: predicted {predicted}, factory deployed to {actual}")]
    AddressMismatch { predicted: Address, actual: Address },

    /// The factory itself is not (or would not be) at its configured address.
    #[error("factory address mismatch: expected {expected}, got {actual}")]
    FactoryAddressMismatch { expected: Address, actual: Address },

    #[error("factory bytecode is not configured")]
    MissingFactoryBytecode,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl Error {
    /// Mismatches mean the derivation or the factory is broken; callers must not
    /// retry them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::AddressMismatch { .. } | Error::FactoryAddressMismatch { .. }
        )
    }
}
