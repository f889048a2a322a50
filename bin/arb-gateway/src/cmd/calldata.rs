use alloy::primitives::{Address, Bytes, U256};
use arb_gateway_precompiles::l2_erc20_gateway::OutboundTransfer;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub(crate) struct CalldataArgs {
    /// Token address on L1
    #[arg(long)]
    l1_token: Address,

    /// Withdrawing account on L2
    #[arg(long)]
    from: Address,

    /// Recipient on L1
    #[arg(long)]
    to: Address,

    /// Amount in base units
    #[arg(long)]
    amount: U256,

    /// Extra data forwarded to L1, hex encoded
    #[arg(long, default_value = "0x")]
    data: Bytes,
}

impl CalldataArgs {
    pub(crate) fn run(self) -> Result<()> {
        let calldata = OutboundTransfer {
            l1_token: self.l1_token,
            from: self.from,
            to: self.to,
            amount: self.amount,
            extra_data: self.data,
        }
        .finalize_calldata();
        println!("{calldata}");
        Ok(())
    }
}
