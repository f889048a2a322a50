use super::L2ERC20TokenGateway;
use crate::{
    Precompile, PrecompileResult, access_control::RolePolicy, dispatch_call, mutate, mutate_void,
    view,
};
use alloy::{primitives::Address, sol_types::SolInterface};
use arb_gateway_contracts::precompiles::{
    DEPOSITS_DISABLER_ROLE, DEPOSITS_ENABLER_ROLE, IAccessControl::IAccessControlCalls,
    IL2ERC20TokenGateway::IL2ERC20TokenGatewayCalls, WITHDRAWALS_DISABLER_ROLE,
    WITHDRAWALS_ENABLER_ROLE,
};

impl<P: RolePolicy> Precompile for L2ERC20TokenGateway<P> {
    fn call(&mut self, calldata: &[u8], msg_sender: Address) -> PrecompileResult {
        // The role registry shares the gateway's address and storage.
        if calldata
            .first_chunk::<4>()
            .is_some_and(|selector| IAccessControlCalls::valid_selector(*selector))
        {
            return self.roles.call(calldata, msg_sender);
        }

        dispatch_call(
            calldata,
            IL2ERC20TokenGatewayCalls::abi_decode,
            |call| match call {
                IL2ERC20TokenGatewayCalls::l1Token(call) => view(call, |_| Ok(self.config.l1_token)),
                IL2ERC20TokenGatewayCalls::l2Token(call) => view(call, |_| Ok(self.config.l2_token)),
                IL2ERC20TokenGatewayCalls::counterpartGateway(call) => {
                    view(call, |_| Ok(self.config.counterpart_gateway))
                }
                IL2ERC20TokenGatewayCalls::router(call) => view(call, |_| Ok(self.config.router)),
                IL2ERC20TokenGatewayCalls::calculateL2TokenAddress(call) => {
                    view(call, |c| Ok(self.calculate_l2_token_address(c.l1ERC20)))
                }
                IL2ERC20TokenGatewayCalls::getOutboundCalldata(call) => {
                    view(call, |c| Ok(self.get_outbound_calldata(c)))
                }
                IL2ERC20TokenGatewayCalls::outboundTransfer(call) => {
                    mutate(call, msg_sender, |sender, c| self.outbound_transfer(sender, c))
                }
                IL2ERC20TokenGatewayCalls::finalizeInboundTransfer(call) => {
                    mutate_void(call, msg_sender, |sender, c| {
                        self.finalize_inbound_transfer(sender, c)
                    })
                }
                IL2ERC20TokenGatewayCalls::initialize(call) => {
                    mutate_void(call, msg_sender, |sender, c| self.initialize(sender, c))
                }
                IL2ERC20TokenGatewayCalls::isInitialized(call) => {
                    view(call, |_| self.is_initialized())
                }
                IL2ERC20TokenGatewayCalls::isDepositsEnabled(call) => {
                    view(call, |_| self.is_deposits_enabled())
                }
                IL2ERC20TokenGatewayCalls::isWithdrawalsEnabled(call) => {
                    view(call, |_| self.is_withdrawals_enabled())
                }
                IL2ERC20TokenGatewayCalls::enableDeposits(call) => {
                    mutate_void(call, msg_sender, |sender, _| self.enable_deposits(sender))
                }
                IL2ERC20TokenGatewayCalls::disableDeposits(call) => {
                    mutate_void(call, msg_sender, |sender, _| self.disable_deposits(sender))
                }
                IL2ERC20TokenGatewayCalls::enableWithdrawals(call) => {
                    mutate_void(call, msg_sender, |sender, _| self.enable_withdrawals(sender))
                }
                IL2ERC20TokenGatewayCalls::disableWithdrawals(call) => {
                    mutate_void(call, msg_sender, |sender, _| self.disable_withdrawals(sender))
                }
                IL2ERC20TokenGatewayCalls::DEPOSITS_ENABLER_ROLE(call) => {
                    view(call, |_| Ok(*DEPOSITS_ENABLER_ROLE))
                }
                IL2ERC20TokenGatewayCalls::DEPOSITS_DISABLER_ROLE(call) => {
                    view(call, |_| Ok(*DEPOSITS_DISABLER_ROLE))
                }
                IL2ERC20TokenGatewayCalls::WITHDRAWALS_ENABLER_ROLE(call) => {
                    view(call, |_| Ok(*WITHDRAWALS_ENABLER_ROLE))
                }
                IL2ERC20TokenGatewayCalls::WITHDRAWALS_DISABLER_ROLE(call) => {
                    view(call, |_| Ok(*WITHDRAWALS_DISABLER_ROLE))
                }
            },
        )
    }
}
