use super::ArbSys;
use crate::{Precompile, PrecompileResult, dispatch_call, mutate, view};
use alloy::{primitives::Address, sol_types::SolInterface};
use arb_gateway_contracts::precompiles::IArbSys::IArbSysCalls;

impl Precompile for ArbSys {
    fn call(&mut self, calldata: &[u8], msg_sender: Address) -> PrecompileResult {
        dispatch_call(calldata, IArbSysCalls::abi_decode, |call| match call {
            IArbSysCalls::arbChainID(call) => view(call, |_| self.arb_chain_id()),
            IArbSysCalls::arbBlockNumber(call) => view(call, |_| self.arb_block_number()),
            IArbSysCalls::sendTxToL1(call) => {
                mutate(call, msg_sender, |sender, c| self.send_tx_to_l1(sender, c))
            }
            IArbSysCalls::mapL1SenderContractAddressToL2Alias(call) => {
                view(call, |c| Ok(self.map_l1_sender_contract_address_to_l2_alias(c)))
            }
            IArbSysCalls::wasMyCallersAddressAliased(call) => {
                view(call, |_| self.was_my_callers_address_aliased())
            }
            IArbSysCalls::myCallersAddressWithoutAliasing(call) => {
                view(call, |_| self.my_callers_address_without_aliasing())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address_aliasing::apply_l1_to_l2_alias,
        storage::{StorageCtx, hashmap::HashMapStorageProvider},
        test_util::{assert_full_coverage, check_selector_coverage},
    };
    use alloy::sol_types::SolCall;
    use arb_gateway_contracts::precompiles::IArbSys;

    #[test]
    fn test_arb_sys_selector_coverage() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        StorageCtx::enter(&mut storage, || {
            let mut arb_sys = ArbSys::new();

            let unsupported =
                check_selector_coverage(&mut arb_sys, IArbSysCalls::SELECTORS, "IArbSys");

            assert_full_coverage([unsupported]);
            Ok(())
        })
    }

    #[test]
    fn test_alias_through_abi() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let l1_gateway = Address::repeat_byte(0x42);

        StorageCtx::enter(&mut storage, || -> eyre::Result<()> {
            let mut arb_sys = ArbSys::new();
            let calldata = IArbSys::mapL1SenderContractAddressToL2AliasCall {
                sender: l1_gateway,
                unused: Address::ZERO,
            }
            .abi_encode();

            let output = arb_sys.call(&calldata, Address::ZERO)?;
            assert_eq!(
                IArbSys::mapL1SenderContractAddressToL2AliasCall::abi_decode_returns(
                    &output.bytes
                )?,
                apply_l1_to_l2_alias(l1_gateway)
            );
            Ok(())
        })
    }
}
