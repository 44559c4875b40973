//! The CREATE2 factory contract: its ABI, deployments through it, and its own
//! bootstrap.

pub mod abi;
mod bootstrap;
mod events;
mod gateway;

pub use bootstrap::{deploy_factory, deploy_factory_from_context};
pub use events::parse_deployed_address;
pub use gateway::{deploy_calldata, FactoryGateway};
