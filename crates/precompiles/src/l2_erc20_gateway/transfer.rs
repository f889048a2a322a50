//! Per-call transfer records. Built from calldata, validated, encoded and dropped.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolType, sol_data},
};
use arb_gateway_contracts::precompiles::{IL2ERC20TokenGateway, L2TokenGatewayError};

use crate::error::{GatewayPrecompileError, Result};

/// `abi.decode(data, (address, bytes))` payload a router attaches to a withdrawal.
type RouterPayload = (sol_data::Address, sol_data::Bytes);

/// A withdrawal from L2 to L1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundTransfer {
    pub l1_token: Address,
    /// Account whose tokens are burned, the router's embedded sender for routed calls.
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub extra_data: Bytes,
}

impl OutboundTransfer {
    /// Resolves the effective sender of an `outboundTransfer` call.
    ///
    /// Direct callers withdraw their own tokens and `data` is the extra payload.
    /// The router prefixes the real sender: `data = abi.encode(sender, extraData)`.
    pub fn resolve(
        caller: Address,
        router: Address,
        call: IL2ERC20TokenGateway::outboundTransferCall,
    ) -> Result<Self> {
        let (from, extra_data) = if caller == router {
            RouterPayload::abi_decode_params(&call.data)
                .map_err(|err| GatewayPrecompileError::MalformedInput(err.to_string()))?
        } else {
            (caller, call.data)
        };

        Ok(Self {
            l1_token: call.l1Token,
            from,
            to: call.to,
            amount: call.amount,
            extra_data,
        })
    }

    pub fn ensure_no_extra_data(&self) -> Result<()> {
        if !self.extra_data.is_empty() {
            return Err(L2TokenGatewayError::extra_data_nonempty().into());
        }
        Ok(())
    }

    /// `finalizeInboundTransfer` calldata for the counterpart gateway on L1.
    ///
    /// Extra data is never forwarded.
    pub fn finalize_calldata(&self) -> Bytes {
        IL2ERC20TokenGateway::finalizeInboundTransferCall {
            l1Token: self.l1_token,
            from: self.from,
            to: self.to,
            amount: self.amount,
            data: Bytes::new(),
        }
        .abi_encode()
        .into()
    }
}

/// A deposit from L1 to L2 relayed by the counterpart gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTransfer {
    pub l1_token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub extra_data: Bytes,
}

impl From<IL2ERC20TokenGateway::finalizeInboundTransferCall> for InboundTransfer {
    fn from(call: IL2ERC20TokenGateway::finalizeInboundTransferCall) -> Self {
        Self {
            l1_token: call.l1Token,
            from: call.from,
            to: call.to,
            amount: call.amount,
            extra_data: call.data,
        }
    }
}
