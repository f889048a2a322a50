use alloy::primitives::{Address, LogData, U256};
use std::{cell::Cell, marker::PhantomData};

use crate::{
    error::{GatewayPrecompileError, Result},
    storage::{PrecompileStorageProvider, TxEnv},
};

type ProviderPtr = *mut (dyn PrecompileStorageProvider + 'static);

// Thread-local storage for accessing `PrecompileStorageProvider`
thread_local! {
    static STORAGE: Cell<Option<ProviderPtr>> = const { Cell::new(None) };
}

/// Thread-local storage guard for precompiles.
///
/// This guard sets up thread-local access to a storage provider for the duration
/// of its lifetime. When dropped, it restores whatever provider was active before
/// it, so guards can nest as long as they are dropped in reverse order.
///
/// # IMPORTANT
///
/// If multiple storage providers are instantiated in parallel threads,
/// they CANNOT point to the same storage addresses.
pub struct StorageGuard<'s> {
    previous: Option<ProviderPtr>,
    _storage: PhantomData<&'s mut dyn PrecompileStorageProvider>,
}

impl<'s> StorageGuard<'s> {
    /// Creates a new storage guard, installing `storage` as the thread's provider.
    pub fn new(storage: &'s mut dyn PrecompileStorageProvider) -> Self {
        let ptr: *mut (dyn PrecompileStorageProvider + 's) = storage;

        // SAFETY: Transmuting lifetime to 'static for `Cell` storage.
        //
        // This is sound because:
        // 1. Type system ensures this guard can't outlive 's
        // 2. The Drop impl restores the previous pointer before the guard is destroyed
        let ptr: ProviderPtr = unsafe { std::mem::transmute(ptr) };

        let previous = STORAGE.with(|s| s.replace(Some(ptr)));
        Self {
            previous,
            _storage: PhantomData,
        }
    }
}

impl Drop for StorageGuard<'_> {
    fn drop(&mut self) {
        STORAGE.with(|s| s.set(self.previous));
    }
}

/// Thread-local storage accessor used by every precompile.
///
/// # Important
///
/// Since it provides access to the current thread-local storage context, it MUST be
/// used with an active `StorageGuard`, usually through [`StorageCtx::enter`].
///
/// Read operations take `&self`, write operations take `&mut self`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StorageCtx;

impl StorageCtx {
    /// Runs `f` with `storage` installed as the thread-local provider.
    pub fn enter<S, R>(storage: &mut S, f: impl FnOnce() -> R) -> R
    where
        S: PrecompileStorageProvider,
    {
        let _guard = StorageGuard::new(storage);
        f()
    }

    /// Execute a function with access to the current thread-local storage provider.
    fn with_storage_call<F, R>(f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn PrecompileStorageProvider) -> Result<R>,
    {
        let storage_ptr = STORAGE.with(|s| s.get()).ok_or_else(|| {
            GatewayPrecompileError::Fatal(
                "No storage context. 'StorageGuard' must be initialized".to_string(),
            )
        })?;

        // SAFETY:
        // - Caller must ensure NO recursive calls.
        // - The guard keeps the pointee alive while it is installed.
        let storage = unsafe { &mut *storage_ptr };
        f(storage)
    }

    pub fn chain_id(&self) -> Result<u64> {
        Self::with_storage_call(|s| Ok(s.chain_id()))
    }

    pub fn block_number(&self) -> Result<u64> {
        Self::with_storage_call(|s| Ok(s.block_number()))
    }

    pub fn tx_env(&self) -> Result<TxEnv> {
        Self::with_storage_call(|s| Ok(s.tx_env()))
    }

    pub fn sload(&self, address: Address, key: U256) -> Result<U256> {
        Self::with_storage_call(|s| s.sload(address, key))
    }

    pub fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()> {
        Self::with_storage_call(|s| s.sstore(address, key, value))
    }

    pub fn emit_event(&mut self, address: Address, event: LogData) -> Result<()> {
        Self::with_storage_call(|s| s.emit_event(address, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::hashmap::HashMapStorageProvider;

    #[test]
    fn test_access_without_guard_is_fatal() {
        let err = StorageCtx.sload(Address::ZERO, U256::ZERO).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_enter_routes_to_provider() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(42161);
        let address = Address::repeat_byte(0x01);

        StorageCtx::enter(&mut storage, || -> Result<()> {
            let mut ctx = StorageCtx;
            ctx.sstore(address, U256::from(1), U256::from(7))?;
            assert_eq!(ctx.sload(address, U256::from(1))?, U256::from(7));
            assert_eq!(ctx.chain_id()?, 42161);
            Ok(())
        })?;

        assert_eq!(storage.get(address, U256::from(1)), U256::from(7));
        Ok(())
    }

    #[test]
    fn test_nested_guards_restore_outer_provider() -> eyre::Result<()> {
        let mut outer = HashMapStorageProvider::new(1);
        let mut inner = HashMapStorageProvider::new(2);

        StorageCtx::enter(&mut outer, || -> Result<()> {
            StorageCtx::enter(&mut inner, || -> Result<()> {
                assert_eq!(StorageCtx.chain_id()?, 2);
                Ok(())
            })?;
            assert_eq!(StorageCtx.chain_id()?, 1);
            Ok(())
        })?;

        assert!(StorageCtx.chain_id().is_err());
        Ok(())
    }
}
