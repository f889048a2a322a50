//! L1-to-L2 address aliasing.
//!
//! An L1 contract calling into L2 shows up as `msg.sender = l1_address + OFFSET`
//! (mod 2^160), so it can never impersonate an L2 account with the same address.

use alloy::primitives::{Address, U160};
use arb_gateway_contracts::precompiles::L1_TO_L2_ALIAS_OFFSET;

/// Address under which `l1_address` appears on L2.
pub fn apply_l1_to_l2_alias(l1_address: Address) -> Address {
    let aliased = U160::from_be_bytes(l1_address.0.0)
        .wrapping_add(U160::from_be_bytes(L1_TO_L2_ALIAS_OFFSET.0.0));
    Address::from(aliased.to_be_bytes::<20>())
}

/// Recovers the L1 address behind an aliased L2 sender.
pub fn undo_l1_to_l2_alias(l2_address: Address) -> Address {
    let original = U160::from_be_bytes(l2_address.0.0)
        .wrapping_sub(U160::from_be_bytes(L1_TO_L2_ALIAS_OFFSET.0.0));
    Address::from(original.to_be_bytes::<20>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use test_case::test_case;

    #[test_case(
        address!("0x0000000000000000000000000000000000000000"),
        address!("0x1111000000000000000000000000000000001111");
        "zero address"
    )]
    #[test_case(
        address!("0x0000000000000000000000000000081759a874b3"),
        address!("0x1111000000000000000000000000081759a885c4");
        "small address"
    )]
    #[test_case(
        address!("0xffffffffffffffffffffffffffffffffffffffff"),
        address!("0x1111000000000000000000000000000000001110");
        "wraps around"
    )]
    fn test_apply_alias(l1: Address, expected: Address) {
        assert_eq!(apply_l1_to_l2_alias(l1), expected);
        assert_eq!(undo_l1_to_l2_alias(expected), l1);
    }

    #[test]
    fn test_undo_is_inverse() {
        for byte in [0x00, 0x01, 0x7f, 0xee, 0xff] {
            let addr = Address::repeat_byte(byte);
            assert_eq!(undo_l1_to_l2_alias(apply_l1_to_l2_alias(addr)), addr);
            assert_eq!(apply_l1_to_l2_alias(undo_l1_to_l2_alias(addr)), addr);
        }
    }
}
