//! # create2_deployer
//!
//! Deterministic contract addresses and deployments through a fixed CREATE2
//! factory.
//!
//! ## Architecture
//!
//! - `salt`: normalizes integer, raw and string salts to 32 bytes
//! - `bytecode`: appends ABI-encoded constructor arguments to creation code
//! - `crypto`: keccak256, addresses, CREATE and CREATE2 derivation
//! - `factory`: the factory ABI, deployments through it, and its bootstrap
//! - `deployer`: prediction plus deployments verified against the prediction
//! - `chain`: the client interface and an in-process chain
//! - `context`: the factory's well-known constants
//! - `config`: command-line configuration
//!
//! The address a contract lands at is
//! `keccak256(0xff || factory || salt || keccak256(initCode))[12..32]`.

pub mod bytecode;
pub mod chain;
pub mod config;
pub mod context;
pub mod crypto;
pub mod deployer;
pub mod error;
pub mod factory;
pub mod salt;

pub use bytecode::{assemble, ConstructorArgs, InitCode};
pub use chain::{ChainClient, InMemoryChain, ProviderError, TransactionReceipt, TransactionRequest};
pub use config::Config;
pub use context::{FactoryContext, DEPLOYER_ADDRESS, FACTORY_ADDRESS};
pub use crypto::{compute_create2_address, create2_address, create_address, Address, LocalSigner};
pub use deployer::{predict_address, DeployRequest, Deployer, Deployment, DeploymentResult};
pub use error::{Error, Result};
pub use factory::{deploy_factory, deploy_factory_from_context};
pub use salt::Salt;
