//! Deploys the factory itself with ordinary contract creation.

use tracing::{error, info};

use super::gateway::reverted_as_failure;
use crate::chain::{ChainClient, TransactionRequest};
use crate::context::FactoryContext;
use crate::crypto::{create_address, Address, LocalSigner};
use crate::error::{Error, Result};

/// Creates the factory from `signer`'s account and checks it landed on the
/// configured factory address.
///
/// The signer must be fresh (nonce 0) and funded. Every CREATE2 prediction
/// assumes the configured address, so any other outcome is fatal.
pub fn deploy_factory<C: ChainClient>(
    client: C,
    signer: &LocalSigner,
    context: &FactoryContext,
) -> Result<Address> {
    let bytecode = context
        .factory_bytecode
        .clone()
        .ok_or(Error::MissingFactoryBytecode)?;

    let expected = context.factory_address;
    let predicted = create_address(&signer.address(), 0);
    if predicted != expected {
        error!(signer = %signer.address(), %predicted, %expected, "signer cannot bootstrap the factory");
        return Err(Error::FactoryAddressMismatch {
            expected,
            actual: predicted,
        });
    }

    let tx = TransactionRequest {
        from: signer.address(),
        to: None,
        data: bytecode,
        gas_limit: context.gas_limit,
    };
    let receipt = client.send_transaction(tx).map_err(reverted_as_failure)?;
    if !receipt.status {
        return Err(Error::DeploymentFailed(format!(
            "factory creation {} reverted",
            receipt.transaction_hash
        )));
    }

    let actual = receipt.contract_address.ok_or_else(|| {
        Error::DeploymentFailed(format!(
            "receipt {} has no contract address",
            receipt.transaction_hash
        ))
    })?;
    if actual != expected {
        error!(%actual, %expected, "factory deployed to unexpected address");
        return Err(Error::FactoryAddressMismatch { expected, actual });
    }

    info!(factory = %actual, tx_hash = %receipt.transaction_hash, "factory deployed");
    Ok(actual)
}

/// Bootstraps the factory with the key carried by `context`.
pub fn deploy_factory_from_context<C: ChainClient>(
    client: C,
    context: &FactoryContext,
) -> Result<Address> {
    let signer = context
        .deployer_key
        .as_ref()
        .ok_or_else(|| Error::InvalidKey("no deployer key configured".into()))?;
    context.validate()?;
    deploy_factory(client, signer, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{InMemoryChain, ProviderError};

    const FACTORY_CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52];

    #[test]
    fn test_bootstrap_with_fresh_signer() {
        let signer = LocalSigner::random();
        let ctx = FactoryContext::for_deployer(signer.address())
            .with_factory_bytecode(FACTORY_CODE.to_vec());
        let chain = InMemoryChain::new();

        let factory = deploy_factory(&chain, &signer, &ctx).unwrap();
        assert_eq!(factory, ctx.factory_address);
        assert_eq!(chain.get_code(&factory).unwrap(), FACTORY_CODE);
    }

    #[test]
    fn test_missing_bytecode() {
        let signer = LocalSigner::random();
        let ctx = FactoryContext::for_deployer(signer.address());
        assert!(matches!(
            deploy_factory(InMemoryChain::new(), &signer, &ctx),
            Err(Error::MissingFactoryBytecode)
        ));
    }

    #[test]
    fn test_wrong_signer_rejected_before_sending() {
        let signer = LocalSigner::random();
        let ctx = FactoryContext::default().with_factory_bytecode(FACTORY_CODE.to_vec());
        let chain = InMemoryChain::new();
        let err = deploy_factory(&chain, &signer, &ctx).unwrap_err();
        assert!(matches!(err, Error::FactoryAddressMismatch { .. }));
        assert_eq!(chain.nonce(&signer.address()), 0);
    }

    #[test]
    fn test_used_nonce_is_fatal() {
        let signer = LocalSigner::random();
        let ctx = FactoryContext::for_deployer(signer.address())
            .with_factory_bytecode(FACTORY_CODE.to_vec());
        let chain = InMemoryChain::new();
        chain
            .send_transaction(TransactionRequest {
                from: signer.address(),
                to: Some(Address::from_bytes([9u8; 20])),
                ..Default::default()
            })
            .unwrap();

        let err = deploy_factory(&chain, &signer, &ctx).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            Error::FactoryAddressMismatch { expected, actual }
                if expected == ctx.factory_address && actual == create_address(&signer.address(), 1)
        ));
    }

    fn keyed_context() -> FactoryContext {
        let signer = LocalSigner::random();
        FactoryContext::for_deployer(signer.address())
            .with_deployer_key(signer)
            .unwrap()
    }

    #[test]
    fn test_bootstrap_from_context() {
        let ctx = keyed_context().with_factory_bytecode(FACTORY_CODE.to_vec());
        let chain = InMemoryChain::new();
        assert_eq!(
            deploy_factory_from_context(&chain, &ctx).unwrap(),
            ctx.factory_address
        );
        assert_eq!(chain.get_code(&ctx.factory_address).unwrap(), FACTORY_CODE);
    }

    #[test]
    fn test_bootstrap_from_context_requires_key_and_bytecode() {
        let without_key = FactoryContext::for_deployer(LocalSigner::random().address())
            .with_factory_bytecode(FACTORY_CODE.to_vec());
        assert!(matches!(
            deploy_factory_from_context(InMemoryChain::new(), &without_key),
            Err(Error::InvalidKey(_))
        ));

        assert!(matches!(
            deploy_factory_from_context(InMemoryChain::new(), &keyed_context()),
            Err(Error::MissingFactoryBytecode)
        ));
    }

    #[test]
    fn test_bootstrap_provider_errors() {
        let ctx = keyed_context().with_factory_bytecode(FACTORY_CODE.to_vec());
        let chain = InMemoryChain::new();

        chain.fail_next_transaction(ProviderError::Reverted("out of gas".into()));
        assert!(matches!(
            deploy_factory_from_context(&chain, &ctx),
            Err(Error::DeploymentFailed(reason)) if reason == "out of gas"
        ));

        chain.fail_next_transaction(ProviderError::Transport("connection refused".into()));
        assert!(matches!(
            deploy_factory_from_context(&chain, &ctx),
            Err(Error::Provider(ProviderError::Transport(_)))
        ));

        deploy_factory_from_context(&chain, &ctx).unwrap();
    }
}
