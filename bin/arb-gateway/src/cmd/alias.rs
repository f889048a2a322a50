use alloy::primitives::Address;
use arb_gateway_precompiles::address_aliasing::{apply_l1_to_l2_alias, undo_l1_to_l2_alias};
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub(crate) struct AliasArgs {
    /// Address to convert
    address: Address,

    /// Treat the address as an L2 alias and recover the L1 address
    #[arg(long)]
    undo: bool,
}

impl AliasArgs {
    pub(crate) fn run(self) -> Result<()> {
        let converted = if self.undo {
            undo_l1_to_l2_alias(self.address)
        } else {
            apply_l1_to_l2_alias(self.address)
        };
        println!("{converted}");
        Ok(())
    }
}
