use super::{AccessControl, RolePolicy};
use crate::{Precompile, PrecompileResult, dispatch_call, mutate_void, view};
use alloy::{primitives::Address, sol_types::SolInterface};
use arb_gateway_contracts::precompiles::{DEFAULT_ADMIN_ROLE, IAccessControl::IAccessControlCalls};

impl Precompile for AccessControl {
    fn call(&mut self, calldata: &[u8], msg_sender: Address) -> PrecompileResult {
        dispatch_call(calldata, IAccessControlCalls::abi_decode, |call| match call {
            IAccessControlCalls::DEFAULT_ADMIN_ROLE(call) => view(call, |_| Ok(DEFAULT_ADMIN_ROLE)),
            IAccessControlCalls::hasRole(call) => {
                view(call, |c| self.has_role(c.role, c.account))
            }
            IAccessControlCalls::getRoleAdmin(call) => view(call, |c| self.get_role_admin(c.role)),
            IAccessControlCalls::grantRole(call) => {
                mutate_void(call, msg_sender, |sender, c| self.grant_role(sender, c))
            }
            IAccessControlCalls::revokeRole(call) => {
                mutate_void(call, msg_sender, |sender, c| self.revoke_role(sender, c))
            }
            IAccessControlCalls::renounceRole(call) => {
                mutate_void(call, msg_sender, |sender, c| self.renounce_role(sender, c))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        storage::{StorageCtx, hashmap::HashMapStorageProvider},
        test_util::{assert_full_coverage, check_selector_coverage},
    };
    use alloy::{primitives::B256, sol_types::SolCall};
    use arb_gateway_contracts::precompiles::IAccessControl;

    #[test]
    fn test_access_control_selector_coverage() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        StorageCtx::enter(&mut storage, || {
            let mut roles = AccessControl::new(Address::repeat_byte(0xac));

            let unsupported = check_selector_coverage(
                &mut roles,
                IAccessControlCalls::SELECTORS,
                "IAccessControl",
            );

            assert_full_coverage([unsupported]);
            Ok(())
        })
    }

    #[test]
    fn test_has_role_through_abi() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let admin = Address::repeat_byte(0xad);

        StorageCtx::enter(&mut storage, || -> eyre::Result<()> {
            let mut roles = AccessControl::new(Address::repeat_byte(0xac));
            roles.setup_role(DEFAULT_ADMIN_ROLE, admin, admin)?;

            let calldata = IAccessControl::hasRoleCall {
                role: B256::ZERO,
                account: admin,
            }
            .abi_encode();
            let output = roles.call(&calldata, Address::ZERO)?;
            assert!(!output.reverted);
            assert!(IAccessControl::hasRoleCall::abi_decode_returns(&output.bytes)?);
            Ok(())
        })
    }
}
