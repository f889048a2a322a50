//! Typed handles over raw 32-byte storage slots.

use std::marker::PhantomData;

use alloy::primitives::{Address, B256, U256, keccak256};

use crate::{
    error::Result,
    storage::{
        StorageCtx,
        slots::{double_mapping_slot, mapping_slot},
    },
};

/// Value that fits in a single storage word.
pub trait StorableType: Sized {
    fn from_word(word: U256) -> Self;
    fn to_word(&self) -> U256;
}

impl StorableType for U256 {
    fn from_word(word: U256) -> Self {
        word
    }

    fn to_word(&self) -> U256 {
        *self
    }
}

impl StorableType for bool {
    fn from_word(word: U256) -> Self {
        !word.is_zero()
    }

    fn to_word(&self) -> U256 {
        U256::from(u8::from(*self))
    }
}

impl StorableType for u8 {
    fn from_word(word: U256) -> Self {
        word.byte(0)
    }

    fn to_word(&self) -> U256 {
        U256::from(*self)
    }
}

impl StorableType for Address {
    fn from_word(word: U256) -> Self {
        Self::from_slice(&word.to_be_bytes::<32>()[12..])
    }

    fn to_word(&self) -> U256 {
        U256::from_be_bytes(self.into_word().0)
    }
}

impl StorableType for B256 {
    fn from_word(word: U256) -> Self {
        Self::new(word.to_be_bytes::<32>())
    }

    fn to_word(&self) -> U256 {
        U256::from_be_bytes(self.0)
    }
}

/// Value usable as a mapping key.
pub trait StorageKey {
    /// Left-padded 32-byte word hashed into the slot.
    fn mapping_key(&self) -> B256;
}

impl StorageKey for Address {
    fn mapping_key(&self) -> B256 {
        self.into_word()
    }
}

impl StorageKey for B256 {
    fn mapping_key(&self) -> B256 {
        *self
    }
}

/// Single storage slot of a contract.
#[derive(Debug)]
pub struct Slot<T> {
    address: Address,
    slot: U256,
    _ty: PhantomData<T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T: StorableType> Slot<T> {
    pub const fn new(address: Address, slot: U256) -> Self {
        Self {
            address,
            slot,
            _ty: PhantomData,
        }
    }

    pub const fn slot(&self) -> U256 {
        self.slot
    }

    pub fn read(&self) -> Result<T> {
        StorageCtx.sload(self.address, self.slot).map(T::from_word)
    }

    pub fn write(&mut self, value: T) -> Result<()> {
        StorageCtx.sstore(self.address, self.slot, value.to_word())
    }
}

/// Solidity `string` stored at a single declared slot.
///
/// Strings shorter than 32 bytes are packed into the slot with `len * 2` in the
/// lowest byte. Longer ones store `len * 2 + 1` and spill their bytes into
/// consecutive slots starting at `keccak256(slot)`.
#[derive(Debug, Clone, Copy)]
pub struct StringSlot {
    address: Address,
    slot: U256,
}

impl StringSlot {
    pub const fn new(address: Address, slot: U256) -> Self {
        Self { address, slot }
    }

    fn data_slot(&self) -> U256 {
        U256::from_be_bytes(keccak256(self.slot.to_be_bytes::<32>()).0)
    }

    pub fn read(&self) -> Result<String> {
        let head = StorageCtx.sload(self.address, self.slot)?;
        let bytes = if head.bit(0) {
            let len: usize = ((head - U256::from(1)) >> 1usize).saturating_to();
            let data_slot = self.data_slot();
            let mut bytes = Vec::with_capacity(len);
            for i in 0..len.div_ceil(32) {
                let word = StorageCtx.sload(self.address, data_slot + U256::from(i))?;
                bytes.extend_from_slice(&word.to_be_bytes::<32>());
            }
            bytes.truncate(len);
            bytes
        } else {
            let len = usize::from(head.byte(0) >> 1);
            head.to_be_bytes::<32>()[..len].to_vec()
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        let mut ctx = StorageCtx;
        if bytes.len() < 32 {
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            word[31] = (bytes.len() * 2) as u8;
            return ctx.sstore(self.address, self.slot, U256::from_be_bytes(word));
        }

        ctx.sstore(self.address, self.slot, U256::from(bytes.len() * 2 + 1))?;
        let data_slot = self.data_slot();
        for (i, chunk) in bytes.chunks(32).enumerate() {
            let mut word = [0u8; 32];
            word[..chunk.len()].copy_from_slice(chunk);
            ctx.sstore(self.address, data_slot + U256::from(i), U256::from_be_bytes(word))?;
        }
        Ok(())
    }
}

/// Solidity `mapping(K => V)` rooted at `base`.
#[derive(Debug)]
pub struct Mapping<K, V> {
    address: Address,
    base: U256,
    _ty: PhantomData<(K, V)>,
}

impl<K: StorageKey, V: StorableType> Mapping<K, V> {
    pub const fn new(address: Address, base: U256) -> Self {
        Self {
            address,
            base,
            _ty: PhantomData,
        }
    }

    pub fn at(&self, key: &K) -> Slot<V> {
        Slot::new(self.address, mapping_slot(key.mapping_key(), self.base))
    }

    pub fn read(&self, key: &K) -> Result<V> {
        self.at(key).read()
    }

    pub fn write(&mut self, key: &K, value: V) -> Result<()> {
        self.at(key).write(value)
    }
}

/// Solidity `mapping(K1 => mapping(K2 => V))` rooted at `base`.
#[derive(Debug)]
pub struct DoubleMapping<K1, K2, V> {
    address: Address,
    base: U256,
    _ty: PhantomData<(K1, K2, V)>,
}

impl<K1: StorageKey, K2: StorageKey, V: StorableType> DoubleMapping<K1, K2, V> {
    pub const fn new(address: Address, base: U256) -> Self {
        Self {
            address,
            base,
            _ty: PhantomData,
        }
    }

    pub fn at(&self, key1: &K1, key2: &K2) -> Slot<V> {
        Slot::new(
            self.address,
            double_mapping_slot(key1.mapping_key(), key2.mapping_key(), self.base),
        )
    }

    pub fn read(&self, key1: &K1, key2: &K2) -> Result<V> {
        self.at(key1, key2).read()
    }

    pub fn write(&mut self, key1: &K1, key2: &K2, value: V) -> Result<()> {
        self.at(key1, key2).write(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::hashmap::HashMapStorageProvider;

    #[test]
    fn test_word_conversions() {
        let addr = Address::repeat_byte(0xab);
        assert_eq!(<Address as StorableType>::from_word(addr.to_word()), addr);
        assert!(bool::from_word(true.to_word()));
        assert!(!bool::from_word(U256::ZERO));
        assert_eq!(u8::from_word(18u8.to_word()), 18);
        let word = B256::repeat_byte(0x42);
        assert_eq!(<B256 as StorableType>::from_word(word.to_word()), word);
    }

    #[test]
    fn test_string_slot_short_and_long() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let contract = Address::repeat_byte(0x10);
        let long = "Wrapped liquid staked Ether 2.0 bridged to Arbitrum One";

        StorageCtx::enter(&mut storage, || -> Result<()> {
            let mut short_slot = StringSlot::new(contract, U256::from(3));
            short_slot.write("wstETH")?;
            assert_eq!(short_slot.read()?, "wstETH");

            let mut long_slot = StringSlot::new(contract, U256::from(4));
            long_slot.write(long)?;
            assert_eq!(long_slot.read()?, long);
            Ok(())
        })?;

        // "wstETH" packed with 2 * len in the last byte
        let head = storage.get(contract, U256::from(3)).to_be_bytes::<32>();
        assert_eq!(&head[..6], b"wstETH");
        assert_eq!(head[31], 12);
        assert_eq!(
            storage.get(contract, U256::from(4)),
            U256::from(long.len() * 2 + 1)
        );
        Ok(())
    }

    #[test]
    fn test_mapping_read_write() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let contract = Address::repeat_byte(0x10);
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);

        StorageCtx::enter(&mut storage, || -> Result<()> {
            let mut balances = Mapping::<Address, U256>::new(contract, U256::ZERO);
            balances.write(&alice, U256::from(10))?;
            assert_eq!(balances.read(&alice)?, U256::from(10));
            assert_eq!(balances.read(&bob)?, U256::ZERO);

            let mut allowances = DoubleMapping::<Address, Address, U256>::new(contract, U256::from(1));
            allowances.write(&alice, &bob, U256::from(3))?;
            assert_eq!(allowances.read(&alice, &bob)?, U256::from(3));
            assert_eq!(allowances.read(&bob, &alice)?, U256::ZERO);
            Ok(())
        })?;

        Ok(())
    }
}
