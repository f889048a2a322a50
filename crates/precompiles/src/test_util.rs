//! Helpers shared by precompile tests.

use alloy::primitives::{Address, hex};

use crate::{Precompile, error::GatewayPrecompileError, error::decode_error};

/// Calls `precompile` once per selector and collects those it does not dispatch.
///
/// Arguments are zero-filled, so a supported selector may still revert for other
/// reasons; only an `UnknownFunctionSelector` revert counts as unsupported.
pub fn check_selector_coverage<P: Precompile>(
    precompile: &mut P,
    selectors: &[[u8; 4]],
    interface_name: &'static str,
) -> Vec<(&'static str, String)> {
    let mut unsupported = Vec::new();
    for selector in selectors {
        let mut calldata = selector.to_vec();
        calldata.extend_from_slice(&[0u8; 32 * 8]);

        let Ok(output) = precompile.call(&calldata, Address::ZERO) else {
            continue;
        };
        if output.reverted
            && matches!(
                decode_error(&output.bytes),
                Some(GatewayPrecompileError::UnknownFunctionSelector(_))
            )
        {
            unsupported.push((interface_name, hex::encode_prefixed(selector)));
        }
    }
    unsupported
}

/// Panics with a readable report if any interface has unsupported selectors.
pub fn assert_full_coverage<const N: usize>(results: [Vec<(&'static str, String)>; N]) {
    let missing: Vec<_> = results.into_iter().flatten().collect();
    assert!(
        missing.is_empty(),
        "unsupported selectors:\n{}",
        missing
            .iter()
            .map(|(interface, selector)| format!("  {interface}: {selector}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
