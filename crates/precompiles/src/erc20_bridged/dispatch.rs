use super::ERC20Bridged;
use crate::{Precompile, PrecompileResult, dispatch_call, mutate, mutate_void, view};
use alloy::{primitives::Address, sol_types::SolInterface};
use arb_gateway_contracts::precompiles::IERC20Bridged::IERC20BridgedCalls;

impl Precompile for ERC20Bridged {
    fn call(&mut self, calldata: &[u8], msg_sender: Address) -> PrecompileResult {
        dispatch_call(calldata, IERC20BridgedCalls::abi_decode, |call| match call {
            IERC20BridgedCalls::name(call) => view(call, |_| self.name()),
            IERC20BridgedCalls::symbol(call) => view(call, |_| self.symbol()),
            IERC20BridgedCalls::decimals(call) => view(call, |_| self.decimals()),
            IERC20BridgedCalls::totalSupply(call) => view(call, |_| self.total_supply()),
            IERC20BridgedCalls::balanceOf(call) => view(call, |c| self.balance_of(c.account)),
            IERC20BridgedCalls::allowance(call) => {
                view(call, |c| self.allowance(c.owner, c.spender))
            }
            IERC20BridgedCalls::bridge(call) => view(call, |_| self.bridge()),
            IERC20BridgedCalls::approve(call) => {
                mutate(call, msg_sender, |sender, c| self.approve(sender, c))
            }
            IERC20BridgedCalls::transfer(call) => {
                mutate(call, msg_sender, |sender, c| self.transfer(sender, c))
            }
            IERC20BridgedCalls::transferFrom(call) => {
                mutate(call, msg_sender, |sender, c| self.transfer_from(sender, c))
            }
            IERC20BridgedCalls::bridgeMint(call) => {
                mutate_void(call, msg_sender, |sender, c| self.bridge_mint(sender, c))
            }
            IERC20BridgedCalls::bridgeBurn(call) => {
                mutate_void(call, msg_sender, |sender, c| self.bridge_burn(sender, c))
            }
        })
    }
}
