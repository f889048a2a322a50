use std::collections::HashMap;

use alloy::primitives::{Address, Log, LogData, U256};

use crate::{
    error::Result,
    storage::{Checkpoint, PrecompileStorageProvider, TxEnv},
};

/// In-memory storage provider with a write journal.
///
/// Every `sstore` records the value it overwrote, so any suffix of the journal
/// can be undone to give transactions all-or-nothing semantics.
#[derive(Debug, Default)]
pub struct HashMapStorageProvider {
    internals: HashMap<(Address, U256), U256>,
    journal: Vec<JournalEntry>,
    logs: Vec<Log>,
    chain_id: u64,
    block_number: u64,
    tx_env: TxEnv,
}

#[derive(Debug, Clone, Copy)]
struct JournalEntry {
    address: Address,
    key: U256,
    previous: U256,
}

impl HashMapStorageProvider {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Reads a slot without going through a storage context.
    pub fn get(&self, address: Address, key: U256) -> U256 {
        self.internals
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_tx_env(&mut self, tx_env: TxEnv) {
        self.tx_env = tx_env;
    }

    pub fn set_block_number(&mut self, block_number: u64) {
        self.block_number = block_number;
    }

    /// Every log emitted and committed so far.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Logs emitted by `address`.
    pub fn get_events(&self, address: Address) -> Vec<LogData> {
        self.logs
            .iter()
            .filter(|log| log.address == address)
            .map(|log| log.data.clone())
            .collect()
    }
}

impl PrecompileStorageProvider for HashMapStorageProvider {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn tx_env(&self) -> TxEnv {
        self.tx_env
    }

    fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()> {
        let previous = if value.is_zero() {
            self.internals.remove(&(address, key))
        } else {
            self.internals.insert((address, key), value)
        };
        self.journal.push(JournalEntry {
            address,
            key,
            previous: previous.unwrap_or_default(),
        });
        Ok(())
    }

    fn sload(&mut self, address: Address, key: U256) -> Result<U256> {
        Ok(self.get(address, key))
    }

    fn emit_event(&mut self, address: Address, event: LogData) -> Result<()> {
        self.logs.push(Log {
            address,
            data: event,
        });
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        Checkpoint {
            journal_len: self.journal.len(),
            logs_len: self.logs.len(),
        }
    }

    fn checkpoint_commit(&mut self, checkpoint: Checkpoint) {
        // Once no checkpoint is open the journal is no longer needed.
        if checkpoint.journal_len == 0 {
            self.journal.clear();
        }
    }

    fn checkpoint_revert(&mut self, checkpoint: Checkpoint) {
        for entry in self.journal.drain(checkpoint.journal_len..).rev() {
            if entry.previous.is_zero() {
                self.internals.remove(&(entry.address, entry.key));
            } else {
                self.internals
                    .insert((entry.address, entry.key), entry.previous);
            }
        }
        self.logs.truncate(checkpoint.logs_len);
    }

    fn logs_since(&self, checkpoint: Checkpoint) -> Vec<Log> {
        self.logs
            .get(checkpoint.logs_len..)
            .map(<[Log]>::to_vec)
            .unwrap_or_default()
    }
}
