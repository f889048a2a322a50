//! Deposit and withdrawal gates, and the one-time role setup guarding them.

use alloy::primitives::{Address, U256};
use arb_gateway_contracts::precompiles::{
    BRIDGING_STATE_POSITION, DEFAULT_ADMIN_ROLE, DEPOSITS_DISABLER_ROLE, DEPOSITS_ENABLER_ROLE,
    IL2ERC20TokenGateway, L2TokenGatewayError, L2TokenGatewayEvent, WITHDRAWALS_DISABLER_ROLE,
    WITHDRAWALS_ENABLER_ROLE,
};
use tracing::debug;

use super::L2ERC20TokenGateway;
use crate::{
    access_control::RolePolicy,
    error::Result,
    storage::{ContractStorage, Slot},
};

/// `{isInitialized, isDepositsEnabled, isWithdrawalsEnabled}` at an unstructured
/// position, so it can't collide with slots of the embedding contract.
#[derive(Debug, Clone, Copy)]
pub struct BridgingState {
    initialized: Slot<bool>,
    deposits_enabled: Slot<bool>,
    withdrawals_enabled: Slot<bool>,
}

impl BridgingState {
    pub fn new(address: Address) -> Self {
        let base = U256::from_be_bytes(BRIDGING_STATE_POSITION.0);
        Self {
            initialized: Slot::new(address, base),
            deposits_enabled: Slot::new(address, base + U256::from(1)),
            withdrawals_enabled: Slot::new(address, base + U256::from(2)),
        }
    }
}

/// Direction of a bridging gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Deposits,
    Withdrawals,
}

impl<P: RolePolicy> L2ERC20TokenGateway<P> {
    /// Grants `DEFAULT_ADMIN_ROLE` to `call.admin`. Succeeds only once.
    pub fn initialize(
        &mut self,
        sender: Address,
        call: IL2ERC20TokenGateway::initializeCall,
    ) -> Result<()> {
        if self.is_initialized()? {
            return Err(L2TokenGatewayError::already_initialized().into());
        }
        self.bridging.initialized.write(true)?;
        self.roles.setup_role(DEFAULT_ADMIN_ROLE, call.admin, sender)?;

        debug!(gateway = %self.address, admin = %call.admin, "gateway initialized");
        self.emit_event(L2TokenGatewayEvent::Initialized(
            IL2ERC20TokenGateway::Initialized { admin: call.admin },
        ))
    }

    pub fn is_initialized(&self) -> Result<bool> {
        self.bridging.initialized.read()
    }

    pub fn is_deposits_enabled(&self) -> Result<bool> {
        self.bridging.deposits_enabled.read()
    }

    pub fn is_withdrawals_enabled(&self) -> Result<bool> {
        self.bridging.withdrawals_enabled.read()
    }

    pub fn enable_deposits(&mut self, sender: Address) -> Result<()> {
        self.set_gate(sender, Gate::Deposits, true)
    }

    pub fn disable_deposits(&mut self, sender: Address) -> Result<()> {
        self.set_gate(sender, Gate::Deposits, false)
    }

    pub fn enable_withdrawals(&mut self, sender: Address) -> Result<()> {
        self.set_gate(sender, Gate::Withdrawals, true)
    }

    pub fn disable_withdrawals(&mut self, sender: Address) -> Result<()> {
        self.set_gate(sender, Gate::Withdrawals, false)
    }

    /// Moves `gate` to `enabled`. Setting a gate to its current state is a no-op.
    fn set_gate(&mut self, sender: Address, gate: Gate, enabled: bool) -> Result<()> {
        let role = match (gate, enabled) {
            (Gate::Deposits, true) => *DEPOSITS_ENABLER_ROLE,
            (Gate::Deposits, false) => *DEPOSITS_DISABLER_ROLE,
            (Gate::Withdrawals, true) => *WITHDRAWALS_ENABLER_ROLE,
            (Gate::Withdrawals, false) => *WITHDRAWALS_DISABLER_ROLE,
        };
        self.roles.check_role(role, sender)?;

        let mut slot = match gate {
            Gate::Deposits => self.bridging.deposits_enabled,
            Gate::Withdrawals => self.bridging.withdrawals_enabled,
        };
        if slot.read()? == enabled {
            return Ok(());
        }
        slot.write(enabled)?;

        debug!(gateway = %self.address, ?gate, enabled, %sender, "bridging gate switched");
        let event = match (gate, enabled) {
            (Gate::Deposits, true) => L2TokenGatewayEvent::DepositsEnabled(
                IL2ERC20TokenGateway::DepositsEnabled { enabler: sender },
            ),
            (Gate::Deposits, false) => L2TokenGatewayEvent::DepositsDisabled(
                IL2ERC20TokenGateway::DepositsDisabled { disabler: sender },
            ),
            (Gate::Withdrawals, true) => L2TokenGatewayEvent::WithdrawalsEnabled(
                IL2ERC20TokenGateway::WithdrawalsEnabled { enabler: sender },
            ),
            (Gate::Withdrawals, false) => L2TokenGatewayEvent::WithdrawalsDisabled(
                IL2ERC20TokenGateway::WithdrawalsDisabled { disabler: sender },
            ),
        };
        self.emit_event(event)
    }
}
