mod access_control;
mod arb_sys;
mod erc20_bridged;
mod l2_erc20_gateway;

pub use access_control::*;
pub use arb_sys::*;
pub use erc20_bridged::*;
pub use l2_erc20_gateway::*;

use alloy_primitives::{Address, address};

/// Address of the ArbSys messaging precompile on every Arbitrum chain.
pub const ARB_SYS_ADDRESS: Address = address!("0x0000000000000000000000000000000000000064");

/// Offset added to an L1 contract address to obtain its L2 alias.
pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("0x1111000000000000000000000000000000001111");

crate::sol! {
    /// Errors raised by the precompile runtime rather than by a contract
    #[derive(Debug, PartialEq, Eq)]
    interface IPrecompile {
        error UnknownFunctionSelector(bytes4 selector);
    }
}
