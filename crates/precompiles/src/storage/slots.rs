//! Solidity storage layout helpers.

use alloy::primitives::{B256, U256, keccak256};

/// Slot of `mapping[key]` for a mapping declared at `base`.
///
/// Matches Solidity: `keccak256(pad32(key) . pad32(base))`.
pub fn mapping_slot(key: B256, base: U256) -> U256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(key.as_slice());
    buf[32..].copy_from_slice(&base.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(buf).0)
}

/// Slot of `mapping[key1][key2]` for a nested mapping declared at `base`.
pub fn double_mapping_slot(key1: B256, key2: B256, base: U256) -> U256 {
    mapping_slot(key2, mapping_slot(key1, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_mapping_slot_matches_solidity_layout() {
        // keccak256(abi.encode(uint256(0), uint256(0)))
        let expected: U256 = "0xad3228b676f7d3cd4284a5443f17f1962b36e491b30a40b2405849e597ba5fb5"
            .parse()
            .unwrap();
        assert_eq!(mapping_slot(B256::ZERO, U256::ZERO), expected);
    }

    #[test]
    fn test_mapping_slots_are_distinct() {
        let a = Address::repeat_byte(0xaa).into_word();
        let b = Address::repeat_byte(0xbb).into_word();

        assert_ne!(mapping_slot(a, U256::ZERO), mapping_slot(b, U256::ZERO));
        assert_ne!(mapping_slot(a, U256::ZERO), mapping_slot(a, U256::from(1)));
        assert_ne!(
            double_mapping_slot(a, b, U256::ZERO),
            double_mapping_slot(b, a, U256::ZERO)
        );
    }
}
