pub mod dispatch;

use alloy::primitives::{Address, U256};
use arb_gateway_contracts::precompiles::{ERC20BridgedError, ERC20BridgedEvent, IERC20Bridged};
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::{GatewayPrecompileError, Result},
    storage::{ContractStorage, DoubleMapping, Mapping, Slot, StorageCtx, StringSlot},
};

const BALANCES_SLOT: U256 = U256::ZERO;
const ALLOWANCES_SLOT: U256 = U256::from_limbs([1, 0, 0, 0]);
const TOTAL_SUPPLY_SLOT: U256 = U256::from_limbs([2, 0, 0, 0]);
const NAME_SLOT: U256 = U256::from_limbs([3, 0, 0, 0]);
const SYMBOL_SLOT: U256 = U256::from_limbs([4, 0, 0, 0]);
const DECIMALS_SLOT: U256 = U256::from_limbs([5, 0, 0, 0]);
const BRIDGE_SLOT: U256 = U256::from_limbs([6, 0, 0, 0]);

/// Token metadata written once at deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// ERC-20 whose supply is only ever changed by its bridge.
///
/// The struct is a handle: all state, metadata included, lives in the storage
/// of `address`, so any contract can bind one to call into the token.
#[derive(Debug)]
pub struct ERC20Bridged {
    address: Address,
    balances: Mapping<Address, U256>,
    allowances: DoubleMapping<Address, Address, U256>,
    total_supply: Slot<U256>,
    name: StringSlot,
    symbol: StringSlot,
    decimals: Slot<u8>,
    bridge: Slot<Address>,
    storage: StorageCtx,
}

impl ERC20Bridged {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: Mapping::new(address, BALANCES_SLOT),
            allowances: DoubleMapping::new(address, ALLOWANCES_SLOT),
            total_supply: Slot::new(address, TOTAL_SUPPLY_SLOT),
            name: StringSlot::new(address, NAME_SLOT),
            symbol: StringSlot::new(address, SYMBOL_SLOT),
            decimals: Slot::new(address, DECIMALS_SLOT),
            bridge: Slot::new(address, BRIDGE_SLOT),
            storage: StorageCtx,
        }
    }

    /// Writes metadata and the bridge address. Called once when the token is deployed.
    pub fn initialize(&mut self, metadata: &TokenMetadata, bridge: Address) -> Result<()> {
        self.name.write(&metadata.name)?;
        self.symbol.write(&metadata.symbol)?;
        self.decimals.write(metadata.decimals)?;
        self.bridge.write(bridge)
    }

    pub fn name(&self) -> Result<String> {
        self.name.read()
    }

    pub fn symbol(&self) -> Result<String> {
        self.symbol.read()
    }

    pub fn decimals(&self) -> Result<u8> {
        self.decimals.read()
    }

    pub fn bridge(&self) -> Result<Address> {
        self.bridge.read()
    }

    pub fn total_supply(&self) -> Result<U256> {
        self.total_supply.read()
    }

    pub fn balance_of(&self, account: Address) -> Result<U256> {
        self.balances.read(&account)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.allowances.read(&owner, &spender)
    }

    pub fn approve(&mut self, sender: Address, call: IERC20Bridged::approveCall) -> Result<bool> {
        self.set_allowance(sender, call.spender, call.amount)?;
        Ok(true)
    }

    pub fn transfer(&mut self, sender: Address, call: IERC20Bridged::transferCall) -> Result<bool> {
        self.move_tokens(sender, call.to, call.amount)?;
        Ok(true)
    }

    pub fn transfer_from(
        &mut self,
        sender: Address,
        call: IERC20Bridged::transferFromCall,
    ) -> Result<bool> {
        self.spend_allowance(call.from, sender, call.amount)?;
        self.move_tokens(call.from, call.to, call.amount)?;
        Ok(true)
    }

    pub fn bridge_mint(
        &mut self,
        sender: Address,
        call: IERC20Bridged::bridgeMintCall,
    ) -> Result<()> {
        self.ensure_bridge(sender)?;
        self.mint(call.account, call.amount)
    }

    pub fn bridge_burn(
        &mut self,
        sender: Address,
        call: IERC20Bridged::bridgeBurnCall,
    ) -> Result<()> {
        self.ensure_bridge(sender)?;
        self.burn(call.account, call.amount)
    }

    /// Credits `amount` new tokens to `account`.
    ///
    /// Outside the bridge this is only used to seed balances at deployment.
    pub fn mint(&mut self, account: Address, amount: U256) -> Result<()> {
        ensure_non_zero(account)?;
        let supply = self
            .total_supply()?
            .checked_add(amount)
            .ok_or_else(GatewayPrecompileError::under_overflow)?;
        // Bounded by the total supply, which did not overflow.
        let balance = self.balance_of(account)? + amount;

        self.total_supply.write(supply)?;
        self.balances.write(&account, balance)?;
        trace!(token = %self.address, %account, %amount, "minted");
        self.emit_event(ERC20BridgedEvent::Transfer(IERC20Bridged::Transfer {
            from: Address::ZERO,
            to: account,
            value: amount,
        }))
    }

    fn burn(&mut self, account: Address, amount: U256) -> Result<()> {
        ensure_non_zero(account)?;
        let balance = self.balance_of(account)?;
        if balance < amount {
            return Err(ERC20BridgedError::not_enough_balance().into());
        }
        let supply = self.total_supply()? - amount;

        self.balances.write(&account, balance - amount)?;
        self.total_supply.write(supply)?;
        trace!(token = %self.address, %account, %amount, "burned");
        self.emit_event(ERC20BridgedEvent::Transfer(IERC20Bridged::Transfer {
            from: account,
            to: Address::ZERO,
            value: amount,
        }))
    }

    fn move_tokens(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        ensure_non_zero(from)?;
        ensure_non_zero(to)?;

        let from_balance = self.balance_of(from)?;
        if from_balance < amount {
            return Err(ERC20BridgedError::not_enough_balance().into());
        }
        self.balances.write(&from, from_balance - amount)?;
        // Sum of two balances never exceeds the total supply.
        let to_balance = self.balance_of(to)? + amount;
        self.balances.write(&to, to_balance)?;

        self.emit_event(ERC20BridgedEvent::Transfer(IERC20Bridged::Transfer {
            from,
            to,
            value: amount,
        }))
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) -> Result<()> {
        ensure_non_zero(owner)?;
        ensure_non_zero(spender)?;
        self.allowances.write(&owner, &spender, amount)?;
        self.emit_event(ERC20BridgedEvent::Approval(IERC20Bridged::Approval {
            owner,
            spender,
            value: amount,
        }))
    }

    fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) -> Result<()> {
        let current = self.allowance(owner, spender)?;
        if current == U256::MAX {
            return Ok(());
        }
        if current < amount {
            return Err(ERC20BridgedError::not_enough_allowance().into());
        }
        self.set_allowance(owner, spender, current - amount)
    }

    fn ensure_bridge(&self, sender: Address) -> Result<()> {
        if sender != self.bridge()? {
            return Err(ERC20BridgedError::not_bridge().into());
        }
        Ok(())
    }
}

fn ensure_non_zero(account: Address) -> Result<()> {
    if account.is_zero() {
        return Err(ERC20BridgedError::account_is_zero_address().into());
    }
    Ok(())
}

impl ContractStorage for ERC20Bridged {
    fn address(&self) -> Address {
        self.address
    }

    fn storage(&mut self) -> &mut StorageCtx {
        &mut self.storage
    }
}
