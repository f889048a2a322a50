pub mod dispatch;

use alloy::primitives::{Address, U256};
use arb_gateway_contracts::precompiles::{ARB_SYS_ADDRESS, ArbSysEvent, IArbSys};
use tracing::debug;

use crate::{
    address_aliasing::{apply_l1_to_l2_alias, undo_l1_to_l2_alias},
    error::{GatewayPrecompileError, Result},
    storage::{ContractStorage, Slot, StorageCtx},
};

/// Number of L2-to-L1 messages sent so far.
const MESSAGE_COUNT_SLOT: U256 = U256::ZERO;

/// L2-to-L1 messenger living at the fixed ArbSys address.
///
/// Message ids are a counter: each `sendTxToL1` bumps it and returns the new
/// value, so ids strictly increase within a chain.
#[derive(Debug)]
pub struct ArbSys {
    address: Address,
    message_count: Slot<U256>,
    storage: StorageCtx,
}

impl Default for ArbSys {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbSys {
    pub fn new() -> Self {
        Self::at(ARB_SYS_ADDRESS)
    }

    /// Messenger bound to a non-canonical address.
    pub fn at(address: Address) -> Self {
        Self {
            address,
            message_count: Slot::new(address, MESSAGE_COUNT_SLOT),
            storage: StorageCtx,
        }
    }

    pub fn arb_chain_id(&self) -> Result<U256> {
        self.storage.chain_id().map(U256::from)
    }

    pub fn arb_block_number(&self) -> Result<U256> {
        self.storage.block_number().map(U256::from)
    }

    pub fn message_count(&self) -> Result<U256> {
        self.message_count.read()
    }

    /// Queues `call.data` for `call.destination` on L1 and returns its id.
    pub fn send_tx_to_l1(
        &mut self,
        caller: Address,
        call: IArbSys::sendTxToL1Call,
    ) -> Result<U256> {
        let position = self
            .message_count()?
            .checked_add(U256::from(1))
            .ok_or_else(GatewayPrecompileError::under_overflow)?;
        self.message_count.write(position)?;

        let arb_block_num = self.arb_block_number()?;
        debug!(%caller, destination = %call.destination, %position, "L2-to-L1 message queued");
        self.emit_event(ArbSysEvent::L2ToL1Tx(IArbSys::L2ToL1Tx {
            caller,
            destination: call.destination,
            position,
            arbBlockNum: arb_block_num,
            data: call.data,
        }))?;
        Ok(position)
    }

    pub fn map_l1_sender_contract_address_to_l2_alias(
        &self,
        call: IArbSys::mapL1SenderContractAddressToL2AliasCall,
    ) -> Address {
        apply_l1_to_l2_alias(call.sender)
    }

    pub fn was_my_callers_address_aliased(&self) -> Result<bool> {
        self.storage.tx_env().map(|env| env.is_l1_message)
    }

    pub fn my_callers_address_without_aliasing(&self) -> Result<Address> {
        let env = self.storage.tx_env()?;
        Ok(if env.is_l1_message {
            undo_l1_to_l2_alias(env.origin)
        } else {
            env.origin
        })
    }

    /// Overrides the message counter, e.g. to continue numbering from a snapshot.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_message_count(&mut self, count: U256) -> Result<()> {
        self.message_count.write(count)
    }
}

impl ContractStorage for ArbSys {
    fn address(&self) -> Address {
        self.address
    }

    fn storage(&mut self) -> &mut StorageCtx {
        &mut self.storage
    }
}
