//! Factory contract interface. Must match the deployed bytecode exactly.

use alloy_sol_types::sol;

sol! {
    interface ICreate2Factory {
        event Deployed(address indexed addr);

        function deploy(bytes memory code, bytes32 salt) external;
    }
}

pub use ICreate2Factory::{deployCall, Deployed};
