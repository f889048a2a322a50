//! Call plumbing shared by every precompile: selector dispatch, ABI return
//! encoding and the mapping from typed errors onto revert output.

use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use tracing::trace;

use crate::error::{GatewayPrecompileError, Result};

/// Result of executing a precompile call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Return data, or revert data when `reverted` is set.
    pub bytes: Bytes,
    pub reverted: bool,
}

impl PrecompileOutput {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            bytes,
            reverted: false,
        }
    }

    pub fn new_reverted(bytes: Bytes) -> Self {
        Self {
            bytes,
            reverted: true,
        }
    }
}

/// Outcome of a precompile call. `Err` is reserved for halting errors, reverts
/// are reported through [`PrecompileOutput::reverted`].
pub type PrecompileResult = Result<PrecompileOutput>;

/// A contract reachable through ABI-encoded calldata.
pub trait Precompile {
    fn call(&mut self, calldata: &[u8], msg_sender: Address) -> PrecompileResult;
}

/// Decodes `calldata` with `decode` and hands the typed call to `f`.
///
/// Short calldata and undecodable arguments revert without data, unknown
/// selectors revert with `UnknownFunctionSelector`.
pub fn dispatch_call<T>(
    calldata: &[u8],
    decode: impl FnOnce(&[u8]) -> alloy::sol_types::Result<T>,
    f: impl FnOnce(T) -> Result<Bytes>,
) -> PrecompileResult {
    let Some(selector) = calldata.first_chunk::<4>() else {
        return into_precompile_result(Err(GatewayPrecompileError::MalformedInput(
            "calldata shorter than a selector".into(),
        )));
    };

    let result = match decode(calldata) {
        Ok(call) => f(call),
        Err(alloy::sol_types::Error::UnknownSelector { .. }) => Err(unknown_selector(*selector)),
        Err(err) => Err(GatewayPrecompileError::MalformedInput(err.to_string())),
    };
    into_precompile_result(result)
}

/// Turns a contract-level result into call output.
pub fn into_precompile_result(result: Result<Bytes>) -> PrecompileResult {
    match result {
        Ok(bytes) => Ok(PrecompileOutput::new(bytes)),
        Err(err) => match err.revert_bytes() {
            Some(bytes) => {
                trace!(%err, "precompile call reverted");
                Ok(PrecompileOutput::new_reverted(bytes))
            }
            None => Err(err),
        },
    }
}

pub fn unknown_selector(selector: [u8; 4]) -> GatewayPrecompileError {
    GatewayPrecompileError::UnknownFunctionSelector(selector)
}

/// Runs a read-only call and ABI-encodes its return value.
pub fn view<C: SolCall>(call: C, f: impl FnOnce(C) -> Result<C::Return>) -> Result<Bytes> {
    f(call).map(|ret| C::abi_encode_returns(&ret).into())
}

/// Runs a state-changing call on behalf of `sender` and ABI-encodes its return value.
pub fn mutate<C: SolCall>(
    call: C,
    sender: Address,
    f: impl FnOnce(Address, C) -> Result<C::Return>,
) -> Result<Bytes> {
    f(sender, call).map(|ret| C::abi_encode_returns(&ret).into())
}

/// Like [`mutate`] for functions without return values.
pub fn mutate_void<C: SolCall>(
    call: C,
    sender: Address,
    f: impl FnOnce(Address, C) -> Result<()>,
) -> Result<Bytes> {
    f(sender, call).map(|()| Bytes::new())
}

/// Asserts that `result` is a revert carrying `expected`.
#[cfg(any(test, feature = "test-utils"))]
pub fn expect_precompile_revert(result: &PrecompileResult, expected: GatewayPrecompileError) {
    match result {
        Ok(output) => {
            assert!(output.reverted, "expected revert, call succeeded");
            assert_eq!(
                Some(output.bytes.clone()),
                expected.revert_bytes(),
                "unexpected revert data"
            );
        }
        Err(err) => panic!("expected revert, call halted with {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_gateway_contracts::precompiles::{
        IERC20Bridged::{self, IERC20BridgedCalls},
        L2TokenGatewayError,
    };
    use alloy::{primitives::U256, sol_types::SolInterface};

    fn dispatch_balance(calldata: &[u8]) -> PrecompileResult {
        dispatch_call(calldata, IERC20BridgedCalls::abi_decode, |call| match call {
            IERC20BridgedCalls::balanceOf(call) => view(call, |c| Ok(U256::from(c.account.0[19]))),
            IERC20BridgedCalls::transfer(call) => mutate(call, Address::ZERO, |_, _| {
                Err(L2TokenGatewayError::withdrawals_disabled().into())
            }),
            _ => Err(GatewayPrecompileError::Fatal("unreachable in test".into())),
        })
    }

    #[test]
    fn test_view_encodes_return() -> eyre::Result<()> {
        let calldata = IERC20Bridged::balanceOfCall {
            account: Address::with_last_byte(7),
        }
        .abi_encode();

        let output = dispatch_balance(&calldata)?;
        assert!(!output.reverted);
        assert_eq!(U256::from_be_slice(&output.bytes), U256::from(7));
        Ok(())
    }

    #[test]
    fn test_typed_error_reverts() {
        let calldata = IERC20Bridged::transferCall {
            to: Address::ZERO,
            amount: U256::ZERO,
        }
        .abi_encode();

        expect_precompile_revert(
            &dispatch_balance(&calldata),
            L2TokenGatewayError::withdrawals_disabled().into(),
        );
    }

    #[test]
    fn test_short_and_unknown_calldata() -> eyre::Result<()> {
        let output = dispatch_balance(&[0x70, 0xa0])?;
        assert!(output.reverted);
        assert!(output.bytes.is_empty());

        expect_precompile_revert(
            &dispatch_balance(&[0xde, 0xad, 0xbe, 0xef]),
            unknown_selector([0xde, 0xad, 0xbe, 0xef]),
        );
        Ok(())
    }

    #[test]
    fn test_truncated_arguments_revert_without_data() -> eyre::Result<()> {
        let calldata = IERC20Bridged::balanceOfCall {
            account: Address::with_last_byte(7),
        }
        .abi_encode();

        let output = dispatch_balance(&calldata[..20])?;
        assert!(output.reverted);
        assert!(output.bytes.is_empty());
        Ok(())
    }

    #[test]
    fn test_fatal_error_halts() {
        let calldata = IERC20Bridged::totalSupplyCall {}.abi_encode();
        assert!(dispatch_balance(&calldata).is_err());
    }
}
