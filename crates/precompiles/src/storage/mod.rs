pub mod hashmap;
pub mod slots;
pub mod thread_local;

pub mod types;
pub use thread_local::{StorageCtx, StorageGuard};
pub use types::*;

use alloy::primitives::{Address, Log, LogData, U256};

use crate::error::Result;

/// Position in the storage journal that a transaction can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) journal_len: usize,
    pub(crate) logs_len: usize,
}

/// Transaction-level context visible to precompiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxEnv {
    /// Top-level sender of the transaction (already aliased for L1 messages).
    pub origin: Address,
    /// Whether the transaction is an L1-to-L2 message.
    pub is_l1_message: bool,
}

/// Low-level storage provider backing the gateway precompiles.
pub trait PrecompileStorageProvider {
    fn chain_id(&self) -> u64;
    fn block_number(&self) -> u64;
    fn tx_env(&self) -> TxEnv;
    fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()>;
    fn sload(&mut self, address: Address, key: U256) -> Result<U256>;
    fn emit_event(&mut self, address: Address, event: LogData) -> Result<()>;

    /// Marks the current journal position.
    fn checkpoint(&mut self) -> Checkpoint;
    /// Keeps every change made since `checkpoint`.
    fn checkpoint_commit(&mut self, checkpoint: Checkpoint);
    /// Undoes every storage write and log made since `checkpoint`.
    fn checkpoint_revert(&mut self, checkpoint: Checkpoint);

    /// Logs emitted since `checkpoint`.
    fn logs_since(&self, checkpoint: Checkpoint) -> Vec<Log>;
}

/// Storage operations for a given (contract) address.
pub trait StorageOps {
    fn sstore(&mut self, slot: U256, value: U256) -> Result<()>;
    fn sload(&self, slot: U256) -> Result<U256>;
}

/// Trait providing access to a contract's address and storage context.
pub trait ContractStorage {
    fn address(&self) -> Address;
    fn storage(&mut self) -> &mut StorageCtx;

    /// Emits `event` from this contract.
    fn emit_event(&mut self, event: impl alloy::primitives::IntoLogData) -> Result<()> {
        let address = self.address();
        self.storage().emit_event(address, event.into_log_data())
    }
}

/// Blanket implementation of `StorageOps` for all types that implement `ContractStorage`.
impl<T> StorageOps for T
where
    T: ContractStorage,
{
    fn sstore(&mut self, slot: U256, value: U256) -> Result<()> {
        let address = self.address();
        self.storage().sstore(address, slot, value)
    }

    fn sload(&self, slot: U256) -> Result<U256> {
        StorageCtx.sload(self.address(), slot)
    }
}
