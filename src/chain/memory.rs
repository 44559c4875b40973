//! Deterministic in-process chain.
//!
//! Contract creation places the transaction data at the sender's nonce address.
//! Any account holding code answers `deploy(bytes,bytes32)` the way the factory
//! does: CREATE2 with the given init code and salt, then a `Deployed(address)`
//! log. There is no EVM, so the init code itself is stored as the new
//! contract's code. Address arithmetic comes from `alloy-primitives`, not from
//! this crate's derivation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use alloy_primitives::{Bytes, B256};
use alloy_sol_types::{SolCall, SolEvent};
use tracing::trace;

use super::{ChainClient, Log, ProviderError, TransactionReceipt, TransactionRequest};
use crate::crypto::{keccak256, Address};
use crate::factory::abi::{deployCall, Deployed};

#[derive(Debug, Default)]
struct State {
    code: HashMap<Address, Vec<u8>>,
    nonces: HashMap<Address, u64>,
    block_number: u64,
    injected_failure: Option<ProviderError>,
}

#[derive(Debug, Default)]
pub struct InMemoryChain {
    state: Mutex<State>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `code` at `address`, e.g. a factory already deployed elsewhere.
    pub fn with_code(self, address: Address, code: Vec<u8>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.code.insert(address, code);
        }
        self
    }

    pub fn nonce(&self, address: &Address) -> u64 {
        self.lock()
            .map(|state| state.nonces.get(address).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn block_number(&self) -> u64 {
        self.lock().map(|state| state.block_number).unwrap_or(0)
    }

    /// Makes the next `send_transaction` fail with `error` without touching state.
    pub fn fail_next_transaction(&self, error: ProviderError) {
        if let Ok(mut state) = self.state.lock() {
            state.injected_failure = Some(error);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ProviderError> {
        self.state
            .lock()
            .map_err(|_| ProviderError::Transport("chain state lock poisoned".into()))
    }
}

/// What a message call to `to` would do.
enum Outcome {
    /// Plain call; nothing created.
    Call,
    /// The factory creates `code` at `address`.
    Create2 { address: Address, code: Vec<u8> },
}

fn execute_call(state: &State, to: &Address, data: &[u8]) -> Result<Outcome, String> {
    if !state.code.contains_key(to) {
        return Ok(Outcome::Call);
    }
    if data.len() < 4 || data[..4] != deployCall::SELECTOR {
        return Err("function selector not recognized".into());
    }

    let call = deployCall::abi_decode(data, true).map_err(|e| format!("bad calldata: {e}"))?;
    if call.code.is_empty() {
        return Err("create2 with empty init code".into());
    }
    let factory: alloy_primitives::Address = (*to).into();
    let address = Address::from(factory.create2_from_code(call.salt.0, &call.code));
    if state.code.contains_key(&address) {
        return Err(format!("contract already exists at {address}"));
    }
    Ok(Outcome::Create2 {
        address,
        code: call.code.to_vec(),
    })
}

fn transaction_hash(tx: &TransactionRequest, nonce: u64) -> B256 {
    let mut preimage = Vec::with_capacity(20 + 8 + 20 + tx.data.len());
    preimage.extend_from_slice(tx.from.as_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(tx.to.unwrap_or(Address::ZERO).as_bytes());
    preimage.extend_from_slice(&tx.data);
    B256::from(keccak256(&preimage))
}

impl ChainClient for InMemoryChain {
    fn get_code(&self, address: &Address) -> Result<Vec<u8>, ProviderError> {
        Ok(self.lock()?.code.get(address).cloned().unwrap_or_default())
    }

    fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionReceipt, ProviderError> {
        let mut state = self.lock()?;
        if let Some(error) = state.injected_failure.take() {
            return Err(error);
        }

        let nonce = {
            let entry = state.nonces.entry(tx.from).or_default();
            let nonce = *entry;
            *entry += 1;
            nonce
        };
        state.block_number += 1;

        let mut receipt = TransactionReceipt {
            transaction_hash: transaction_hash(&tx, nonce),
            status: true,
            contract_address: None,
            block_number: state.block_number,
            logs: Vec::new(),
        };

        match tx.to {
            None => {
                let sender: alloy_primitives::Address = tx.from.into();
                let address = Address::from(sender.create(nonce));
                if tx.data.is_empty() || state.code.contains_key(&address) {
                    receipt.status = false;
                } else {
                    state.code.insert(address, tx.data);
                    receipt.contract_address = Some(address);
                }
            }
            Some(to) => match execute_call(&state, &to, &tx.data) {
                Ok(Outcome::Call) => {}
                Ok(Outcome::Create2 { address, code }) => {
                    state.code.insert(address, code);
                    receipt.logs.push(Log {
                        address: to,
                        topics: vec![Deployed::SIGNATURE_HASH, B256::from(address.to_word())],
                        data: Bytes::new(),
                    });
                }
                Err(reason) => {
                    trace!(%reason, "transaction reverted");
                    receipt.status = false;
                }
            },
        }

        Ok(receipt)
    }

    fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        let state = self.lock()?;
        match execute_call(&state, to, data) {
            Ok(_) => Ok(Vec::new()),
            Err(reason) => Err(ProviderError::Reverted(reason)),
        }
    }
}
