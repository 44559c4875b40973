//! Address prediction and verified deployments through the factory.
//!
//! Prediction and deployment share [`prepare`], so the address a caller is
//! shown and the address a deployment is checked against come from the same
//! derivation.

use serde::Serialize;
use tracing::{error, info};

use crate::bytecode::{assemble, ConstructorArgs, InitCode};
use crate::chain::{ChainClient, TransactionReceipt};
use crate::context::FactoryContext;
use crate::crypto::{create2_address, Address};
use crate::error::{Error, Result};
use crate::factory::{parse_deployed_address, FactoryGateway};
use crate::salt::Salt;

/// What to deploy and under which salt.
#[derive(Clone, Debug)]
pub struct DeployRequest {
    pub salt: Salt,
    pub creation_code: Vec<u8>,
    pub args: ConstructorArgs,
}

impl DeployRequest {
    pub fn new(salt: impl Into<Salt>, creation_code: impl Into<Vec<u8>>) -> Self {
        Self {
            salt: salt.into(),
            creation_code: creation_code.into(),
            args: ConstructorArgs::new(),
        }
    }

    pub fn with_args(mut self, args: ConstructorArgs) -> Self {
        self.args = args;
        self
    }
}

/// A request resolved to the exact bytes sent on-chain.
#[derive(Clone, Debug)]
pub struct PreparedDeployment {
    pub salt: [u8; 32],
    pub init_code: InitCode,
    pub address: Address,
}

/// Normalizes the salt, assembles the init code and derives the address.
pub fn prepare(context: &FactoryContext, request: &DeployRequest) -> Result<PreparedDeployment> {
    let salt = request.salt.to_bytes();
    let init_code = assemble(&request.creation_code, &request.args)?;
    let address = Address::from_bytes(create2_address(
        context.factory_address.as_bytes(),
        &salt,
        &init_code.hash(),
    ));
    Ok(PreparedDeployment {
        salt,
        init_code,
        address,
    })
}

/// The address `request` will be deployed at. Pure; no network access.
pub fn predict_address(context: &FactoryContext, request: &DeployRequest) -> Result<Address> {
    prepare(context, request).map(|prepared| prepared.address)
}

/// A confirmed deployment whose on-chain address matched the prediction.
#[derive(Clone, Debug, Serialize)]
pub struct DeploymentResult {
    pub transaction_hash: alloy_primitives::B256,
    pub address: Address,
    pub receipt: TransactionReceipt,
}

#[derive(Clone, Debug)]
pub enum Deployment {
    /// Code was already present at the predicted address; nothing was sent.
    Existing(Address),
    Deployed(DeploymentResult),
}

impl Deployment {
    pub fn address(&self) -> Address {
        match self {
            Deployment::Existing(address) => *address,
            Deployment::Deployed(result) => result.address,
        }
    }
}

pub struct Deployer<C> {
    client: C,
    context: FactoryContext,
}

impl<C: ChainClient> Deployer<C> {
    pub fn new(client: C, context: FactoryContext) -> Self {
        Self { client, context }
    }

    pub fn context(&self) -> &FactoryContext {
        &self.context
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn predict_address(&self, request: &DeployRequest) -> Result<Address> {
        predict_address(&self.context, request)
    }

    /// Whether any code lives at `address`.
    pub fn is_deployed(&self, address: &Address) -> Result<bool> {
        Ok(!self.client.get_code(address)?.is_empty())
    }

    pub fn is_factory_deployed(&self) -> Result<bool> {
        self.is_deployed(&self.context.factory_address)
    }

    /// Deploys through the factory and verifies the factory's `Deployed` event
    /// names the predicted address.
    ///
    /// Deploying the same salt and code twice fails with
    /// [`Error::DeploymentFailed`]. An [`Error::AddressMismatch`] means the
    /// derivation or the factory is wrong and must not be retried.
    pub fn deploy(&self, sender: Address, request: &DeployRequest) -> Result<DeploymentResult> {
        let prepared = prepare(&self.context, request)?;
        let gateway = FactoryGateway::new(&self.client, &self.context);

        let receipt = gateway.submit(sender, &prepared.init_code, &prepared.salt)?;
        let actual = parse_deployed_address(&receipt, &self.context.factory_address)?;
        if actual != prepared.address {
            error!(
                predicted = %prepared.address,
                %actual,
                tx_hash = %receipt.transaction_hash,
                "deployed address does not match CREATE2 prediction"
            );
            return Err(Error::AddressMismatch {
                predicted: prepared.address,
                actual,
            });
        }

        info!(address = %actual, tx_hash = %receipt.transaction_hash, "contract deployed");
        Ok(DeploymentResult {
            transaction_hash: receipt.transaction_hash,
            address: actual,
            receipt,
        })
    }

    /// Deploys unless code already exists at the predicted address.
    pub fn ensure_deployed(&self, sender: Address, request: &DeployRequest) -> Result<Deployment> {
        let address = self.predict_address(request)?;
        if self.is_deployed(&address)? {
            info!(%address, "already deployed, skipping");
            return Ok(Deployment::Existing(address));
        }
        self.deploy(sender, request).map(Deployment::Deployed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::InMemoryChain;

    const CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0x00];

    fn deployer() -> Deployer<InMemoryChain> {
        let ctx = FactoryContext::default();
        let chain = InMemoryChain::new().with_code(ctx.factory_address, vec![0xfe]);
        Deployer::new(chain, ctx)
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let ctx = FactoryContext::default();
        let request = DeployRequest::new("hello", CODE);
        assert_eq!(
            predict_address(&ctx, &request).unwrap(),
            predict_address(&ctx, &request).unwrap()
        );
    }

    #[test]
    fn test_prediction_depends_on_factory() {
        let request = DeployRequest::new(1u64, CODE);
        let a = predict_address(&FactoryContext::default(), &request).unwrap();
        let other = FactoryContext::default().with_factory_address(Address::from_bytes([1u8; 20]));
        let b = predict_address(&other, &request).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_deploy_then_exists() {
        let deployer = deployer();
        let sender = Address::from_bytes([1u8; 20]);
        let request = DeployRequest::new("hello", CODE);
        let predicted = deployer.predict_address(&request).unwrap();

        assert!(!deployer.is_deployed(&predicted).unwrap());
        let result = deployer.deploy(sender, &request).unwrap();
        assert_eq!(result.address, predicted);
        assert_eq!(result.transaction_hash, result.receipt.transaction_hash);
        assert!(deployer.is_deployed(&predicted).unwrap());
    }

    #[test]
    fn test_ensure_deployed_is_idempotent() {
        let deployer = deployer();
        let sender = Address::from_bytes([1u8; 20]);
        let request = DeployRequest::new(42u64, CODE);

        let first = deployer.ensure_deployed(sender, &request).unwrap();
        assert!(matches!(first, Deployment::Deployed(_)));
        let second = deployer.ensure_deployed(sender, &request).unwrap();
        assert!(matches!(second, Deployment::Existing(_)));
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn test_missing_factory_is_event_not_found() {
        let deployer = Deployer::new(InMemoryChain::new(), FactoryContext::default());
        assert!(!deployer.is_factory_deployed().unwrap());
        let err = deployer
            .deploy(Address::from_bytes([1u8; 20]), &DeployRequest::new("hello", CODE))
            .unwrap_err();
        assert!(matches!(err, Error::EventNotFound { .. }));
    }

    #[test]
    fn test_encoding_error_sends_nothing() {
        let deployer = deployer();
        let request = DeployRequest::new("hello", CODE).with_args(ConstructorArgs::new().push(
            alloy_dyn_abi::DynSolType::Address,
            alloy_dyn_abi::DynSolValue::Bool(false),
        ));
        assert!(matches!(
            deployer.deploy(Address::from_bytes([1u8; 20]), &request),
            Err(Error::Encoding(_))
        ));
        assert_eq!(deployer.client().block_number(), 0);
    }
}
