//! Error type shared by every gateway precompile.

use alloy::{
    primitives::Bytes,
    sol_types::{Panic, PanicKind, SolError, SolInterface},
};
use arb_gateway_contracts::precompiles::{
    AccessControlError, ERC20BridgedError, IPrecompile, L2TokenGatewayError,
};

pub type Result<T, E = GatewayPrecompileError> = core::result::Result<T, E>;

/// Failure of a precompile call.
///
/// Every variant except [`GatewayPrecompileError::Fatal`] is a revert: it is
/// ABI-encoded into the call output and rolls the transaction back. `Fatal`
/// signals a broken host (e.g. no storage context) and halts execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayPrecompileError {
    #[error("L2 token gateway error: {0:?}")]
    L2TokenGateway(L2TokenGatewayError),

    #[error("bridged token error: {0:?}")]
    ERC20Bridged(ERC20BridgedError),

    #[error("access control error: {0:?}")]
    AccessControl(AccessControlError),

    /// Calldata that could not be ABI-decoded. Reverts without data.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("unknown function selector: 0x{}", alloy::primitives::hex::encode(.0))]
    UnknownFunctionSelector([u8; 4]),

    #[error("panic: {0:?}")]
    Panic(PanicKind),

    #[error("fatal precompile error: {0}")]
    Fatal(String),
}

impl GatewayPrecompileError {
    pub const fn under_overflow() -> Self {
        Self::Panic(PanicKind::UnderOverflow)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// ABI-encoded revert data, or `None` for a halting error.
    pub fn revert_bytes(&self) -> Option<Bytes> {
        let bytes = match self {
            Self::L2TokenGateway(err) => err.abi_encode(),
            Self::ERC20Bridged(err) => err.abi_encode(),
            Self::AccessControl(err) => err.abi_encode(),
            Self::MalformedInput(_) => Vec::new(),
            Self::UnknownFunctionSelector(selector) => IPrecompile::UnknownFunctionSelector {
                selector: (*selector).into(),
            }
            .abi_encode(),
            Self::Panic(kind) => Panic::from(*kind).abi_encode(),
            Self::Fatal(_) => return None,
        };
        Some(bytes.into())
    }
}

impl From<L2TokenGatewayError> for GatewayPrecompileError {
    fn from(err: L2TokenGatewayError) -> Self {
        Self::L2TokenGateway(err)
    }
}

impl From<ERC20BridgedError> for GatewayPrecompileError {
    fn from(err: ERC20BridgedError) -> Self {
        Self::ERC20Bridged(err)
    }
}

impl From<AccessControlError> for GatewayPrecompileError {
    fn from(err: AccessControlError) -> Self {
        Self::AccessControl(err)
    }
}

/// Decodes revert data produced by one of the gateway precompiles.
pub fn decode_error(data: &[u8]) -> Option<GatewayPrecompileError> {
    if data.len() < 4 {
        return None;
    }

    if let Ok(err) = L2TokenGatewayError::abi_decode(data) {
        return Some(err.into());
    }
    if let Ok(err) = ERC20BridgedError::abi_decode(data) {
        return Some(err.into());
    }
    if let Ok(err) = AccessControlError::abi_decode(data) {
        return Some(err.into());
    }
    if let Ok(err) = IPrecompile::UnknownFunctionSelector::abi_decode(data) {
        return Some(GatewayPrecompileError::UnknownFunctionSelector(err.selector.0));
    }
    Panic::abi_decode(data)
        .ok()
        .and_then(|panic| panic.kind())
        .map(GatewayPrecompileError::Panic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use alloy::primitives::B256;

    #[test]
    fn test_revert_bytes_roundtrip_through_decode() {
        let errors = [
            GatewayPrecompileError::from(L2TokenGatewayError::withdrawals_disabled()),
            GatewayPrecompileError::from(ERC20BridgedError::not_bridge()),
            GatewayPrecompileError::from(AccessControlError::unauthorized_account(
                Address::repeat_byte(0x11),
                B256::repeat_byte(0x22),
            )),
            GatewayPrecompileError::under_overflow(),
            GatewayPrecompileError::UnknownFunctionSelector([0xde, 0xad, 0xbe, 0xef]),
        ];

        for err in errors {
            let bytes = err.revert_bytes().expect("reverting error");
            assert_eq!(decode_error(&bytes), Some(err));
        }
    }

    #[test]
    fn test_malformed_input_reverts_without_data() {
        let err = GatewayPrecompileError::MalformedInput("bad".into());
        assert_eq!(err.revert_bytes(), Some(Bytes::new()));
        assert_eq!(decode_error(&[]), None);
    }

    #[test]
    fn test_fatal_has_no_revert_bytes() {
        let err = GatewayPrecompileError::Fatal("no storage".into());
        assert!(err.is_fatal());
        assert!(err.revert_bytes().is_none());
    }

    #[test]
    fn test_selector_display() {
        let err = GatewayPrecompileError::UnknownFunctionSelector([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(err.to_string(), "unknown function selector: 0xdeadbeef");
    }
}
