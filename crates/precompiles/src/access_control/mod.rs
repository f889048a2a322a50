pub mod dispatch;

use alloy::primitives::{Address, B256, U256};
use arb_gateway_contracts::precompiles::{AccessControlError, AccessControlEvent, IAccessControl};
use tracing::debug;

use crate::{
    Precompile,
    error::Result,
    storage::{ContractStorage, DoubleMapping, Slot, StorageCtx, slots::mapping_slot},
};

/// Slot of `mapping(bytes32 role => RoleData)`.
const ROLES_SLOT: U256 = U256::ZERO;

/// Authorization seam between a contract and the roles guarding it.
pub trait RolePolicy: Precompile {
    fn has_role(&self, role: B256, account: Address) -> Result<bool>;

    /// Reverts with `AccessControlUnauthorizedAccount` unless `account` holds `role`.
    fn check_role(&self, role: B256, account: Address) -> Result<()> {
        if self.has_role(role, account)? {
            Ok(())
        } else {
            Err(AccessControlError::unauthorized_account(account, role).into())
        }
    }

    /// Grants `role` without checking `sender`'s authority.
    fn setup_role(&mut self, role: B256, account: Address, sender: Address) -> Result<()>;
}

/// OpenZeppelin-style role registry living in the storage of the contract that embeds it.
///
/// Layout follows `AccessControl` v5: `RoleData { mapping(address => bool) hasRole;
/// bytes32 adminRole; }` keyed by role at slot 0.
#[derive(Debug)]
pub struct AccessControl {
    address: Address,
    members: DoubleMapping<B256, Address, bool>,
    storage: StorageCtx,
}

impl AccessControl {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            members: DoubleMapping::new(address, ROLES_SLOT),
            storage: StorageCtx,
        }
    }

    fn admin_slot(&self, role: B256) -> Slot<B256> {
        Slot::new(self.address, mapping_slot(role, ROLES_SLOT) + U256::from(1))
    }

    pub fn get_role_admin(&self, role: B256) -> Result<B256> {
        self.admin_slot(role).read()
    }

    pub fn grant_role(&mut self, sender: Address, call: IAccessControl::grantRoleCall) -> Result<()> {
        self.check_role(self.get_role_admin(call.role)?, sender)?;
        self.grant(call.role, call.account, sender)?;
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        sender: Address,
        call: IAccessControl::revokeRoleCall,
    ) -> Result<()> {
        self.check_role(self.get_role_admin(call.role)?, sender)?;
        self.revoke(call.role, call.account, sender)?;
        Ok(())
    }

    pub fn renounce_role(
        &mut self,
        sender: Address,
        call: IAccessControl::renounceRoleCall,
    ) -> Result<()> {
        if call.callerConfirmation != sender {
            return Err(AccessControlError::bad_confirmation().into());
        }
        self.revoke(call.role, sender, sender)?;
        Ok(())
    }

    /// Makes `admin_role` the admin of `role`. Roles have no setter through the ABI.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_role_admin(&mut self, role: B256, admin_role: B256) -> Result<()> {
        let previous = self.get_role_admin(role)?;
        self.admin_slot(role).write(admin_role)?;
        self.emit_event(AccessControlEvent::RoleAdminChanged(
            IAccessControl::RoleAdminChanged {
                role,
                previousAdminRole: previous,
                newAdminRole: admin_role,
            },
        ))
    }

    /// Returns whether the role was newly granted.
    fn grant(&mut self, role: B256, account: Address, sender: Address) -> Result<bool> {
        if self.has_role(role, account)? {
            return Ok(false);
        }
        self.members.write(&role, &account, true)?;
        debug!(%role, %account, %sender, "role granted");
        self.emit_event(AccessControlEvent::RoleGranted(IAccessControl::RoleGranted {
            role,
            account,
            sender,
        }))?;
        Ok(true)
    }

    /// Returns whether the role was actually held.
    fn revoke(&mut self, role: B256, account: Address, sender: Address) -> Result<bool> {
        if !self.has_role(role, account)? {
            return Ok(false);
        }
        self.members.write(&role, &account, false)?;
        debug!(%role, %account, %sender, "role revoked");
        self.emit_event(AccessControlEvent::RoleRevoked(IAccessControl::RoleRevoked {
            role,
            account,
            sender,
        }))?;
        Ok(true)
    }
}

impl ContractStorage for AccessControl {
    fn address(&self) -> Address {
        self.address
    }

    fn storage(&mut self) -> &mut StorageCtx {
        &mut self.storage
    }
}

impl RolePolicy for AccessControl {
    fn has_role(&self, role: B256, account: Address) -> Result<bool> {
        self.members.read(&role, &account)
    }

    fn setup_role(&mut self, role: B256, account: Address, sender: Address) -> Result<()> {
        self.grant(role, account, sender).map(drop)
    }
}
