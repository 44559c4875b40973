//! Chain client interface consumed by the factory gateway.
//!
//! Transport, signing and confirmation policy belong to the implementor. Any
//! client with these semantics is interchangeable.

mod memory;

pub use memory::InMemoryChain;

use alloy_primitives::{Bytes, B256};
use serde::Serialize;

use crate::crypto::Address;

/// Minimal view of an Ethereum node.
pub trait ChainClient {
    /// Runtime code at `address`; empty when no contract lives there.
    fn get_code(&self, address: &Address) -> Result<Vec<u8>, ProviderError>;

    /// Signs (for `tx.from`) and broadcasts `tx`, blocking until it is mined.
    ///
    /// A mined transaction that reverted is returned as a receipt with
    /// `status == false`; clients that detect the revert earlier may return
    /// [`ProviderError::Reverted`] instead.
    fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionReceipt, ProviderError>;

    /// Executes a read-only call against the latest state.
    fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ProviderError>;
}

impl<T: ChainClient + ?Sized> ChainClient for &T {
    fn get_code(&self, address: &Address) -> Result<Vec<u8>, ProviderError> {
        (**self).get_code(address)
    }

    fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionReceipt, ProviderError> {
        (**self).send_transaction(tx)
    }

    fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        (**self).call(to, data)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("execution reverted: {0}")]
    Reverted(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    /// `None` creates a contract from `data`.
    pub to: Option<Address>,
    pub data: Vec<u8>,
    pub gas_limit: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    /// `false` when execution reverted.
    pub status: bool,
    /// Set for contract-creation transactions.
    pub contract_address: Option<Address>,
    pub block_number: u64,
    pub logs: Vec<Log>,
}
