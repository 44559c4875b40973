//! Submits `deploy(bytes,bytes32)` transactions to the factory.

use alloy_sol_types::SolCall;
use tracing::{debug, info, warn};

use super::abi::deployCall;
use crate::bytecode::InitCode;
use crate::chain::{ChainClient, ProviderError, TransactionReceipt, TransactionRequest};
use crate::context::FactoryContext;
use crate::crypto::Address;
use crate::error::{Error, Result};

/// ABI-encoded `deploy(code, salt)` call.
pub fn deploy_calldata(init_code: &InitCode, salt: &[u8; 32]) -> Vec<u8> {
    deployCall {
        code: init_code.as_bytes().to_vec().into(),
        salt: (*salt).into(),
    }
    .abi_encode()
}

pub struct FactoryGateway<C> {
    client: C,
    factory: Address,
    gas_limit: Option<u64>,
}

impl<C: ChainClient> FactoryGateway<C> {
    pub fn new(client: C, context: &FactoryContext) -> Self {
        Self {
            client,
            factory: context.factory_address,
            gas_limit: context.gas_limit,
        }
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Sends the deployment and waits for it to be mined.
    ///
    /// `salt` must be the same 32 bytes the address was derived with. A revert,
    /// including the one the factory raises when the target already holds a
    /// contract, is a [`Error::DeploymentFailed`].
    pub fn submit(
        &self,
        sender: Address,
        init_code: &InitCode,
        salt: &[u8; 32],
    ) -> Result<TransactionReceipt> {
        let tx = TransactionRequest {
            from: sender,
            to: Some(self.factory),
            data: deploy_calldata(init_code, salt),
            gas_limit: self.gas_limit,
        };
        debug!(
            factory = %self.factory,
            %sender,
            salt = %hex::encode(salt),
            init_code_len = init_code.len(),
            "submitting factory deployment"
        );

        let receipt = self.client.send_transaction(tx).map_err(reverted_as_failure)?;
        if !receipt.status {
            warn!(tx_hash = %receipt.transaction_hash, "factory deployment reverted");
            return Err(Error::DeploymentFailed(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            block = receipt.block_number,
            "factory deployment mined"
        );
        Ok(receipt)
    }

    /// Dry-runs the deployment through `call` without sending a transaction.
    pub fn simulate(&self, init_code: &InitCode, salt: &[u8; 32]) -> Result<()> {
        self.client
            .call(&self.factory, &deploy_calldata(init_code, salt))
            .map_err(reverted_as_failure)?;
        Ok(())
    }
}

/// A revert reported by the provider is a failed deployment; anything else is
/// a provider error.
pub(crate) fn reverted_as_failure(err: ProviderError) -> Error {
    match err {
        ProviderError::Reverted(reason) => Error::DeploymentFailed(reason),
        other => Error::Provider(other),
    }
}
