//! Well-known factory constants, carried as an explicit value.

use crate::crypto::{create_address, Address, LocalSigner};
use crate::error::{Error, Result};

/// Address of the factory on every network it has been bootstrapped on.
pub const FACTORY_ADDRESS: Address = Address::from_bytes([
    0x4a, 0x27, 0xc0, 0x59, 0xfd, 0x7e, 0x38, 0x38, 0x54, 0xea, 0x7d, 0xe6, 0xbe, 0x9c, 0x39, 0x0a,
    0x79, 0x5f, 0x6e, 0xe3,
]);

/// Account whose first transaction (nonce 0) creates the factory.
pub const DEPLOYER_ADDRESS: Address = Address::from_bytes([
    0x22, 0x87, 0xfa, 0x6e, 0xfd, 0xec, 0x6d, 0x8c, 0x3e, 0x0f, 0x46, 0x12, 0xce, 0x55, 0x1d, 0xec,
    0xf8, 0x9a, 0x35, 0x7a,
]);

/// Everything the deployment components need to know about the factory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryContext {
    pub factory_address: Address,
    pub deployer_address: Address,
    /// Key of `deployer_address`, needed only to bootstrap the factory. Never
    /// compiled in; supplied at run time.
    pub deployer_key: Option<LocalSigner>,
    /// Creation code of the factory, needed only to bootstrap it.
    pub factory_bytecode: Option<Vec<u8>>,
    /// Gas limit for submitted transactions; `None` leaves it to the client.
    pub gas_limit: Option<u64>,
}

impl Default for FactoryContext {
    fn default() -> Self {
        Self {
            factory_address: FACTORY_ADDRESS,
            deployer_address: DEPLOYER_ADDRESS,
            deployer_key: None,
            factory_bytecode: None,
            gas_limit: None,
        }
    }
}

impl FactoryContext {
    /// A context for a factory bootstrapped by `deployer` at nonce 0.
    pub fn for_deployer(deployer: Address) -> Self {
        Self {
            factory_address: create_address(&deployer, 0),
            deployer_address: deployer,
            ..Self::default()
        }
    }

    /// Attaches the bootstrap key, which must control `deployer_address`.
    pub fn with_deployer_key(mut self, signer: LocalSigner) -> Result<Self> {
        check_deployer_key(&signer, &self.deployer_address)?;
        self.deployer_key = Some(signer);
        Ok(self)
    }

    pub fn with_factory_address(mut self, address: Address) -> Self {
        self.factory_address = address;
        self
    }

    pub fn with_factory_bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.factory_bytecode = Some(bytecode);
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// The address the deployer's nonce-0 transaction creates.
    pub fn bootstrap_address(&self) -> Address {
        create_address(&self.deployer_address, 0)
    }

    /// Checks that bootstrapping from `deployer_address` lands on
    /// `factory_address`, and that a configured key controls `deployer_address`.
    pub fn validate(&self) -> Result<()> {
        if let Some(signer) = &self.deployer_key {
            check_deployer_key(signer, &self.deployer_address)?;
        }
        let actual = self.bootstrap_address();
        if actual != self.factory_address {
            return Err(Error::FactoryAddressMismatch {
                expected: self.factory_address,
                actual,
            });
        }
        Ok(())
    }
}

fn check_deployer_key(signer: &LocalSigner, deployer: &Address) -> Result<()> {
    if signer.address() != *deployer {
        return Err(Error::InvalidKey(format!(
            "key controls {}, deployer is {}",
            signer.address(),
            deployer
        )));
    }
    Ok(())
}
