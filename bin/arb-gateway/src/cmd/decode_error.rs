use arb_gateway_precompiles::decode_error;
use clap::Parser;
use eyre::{Result, WrapErr};

#[derive(Parser, Debug)]
pub(crate) struct DecodeErrorArgs {
    /// Revert data, hex encoded with or without 0x prefix
    data: String,
}

impl DecodeErrorArgs {
    pub(crate) fn run(self) -> Result<()> {
        let data = const_hex::decode(self.data.trim()).wrap_err("revert data is not valid hex")?;

        match decode_error(&data) {
            Some(err) => println!("{err}"),
            None if data.is_empty() => println!("revert without data (malformed input)"),
            None => eyre::bail!("unrecognized revert data 0x{}", const_hex::encode(&data)),
        }
        Ok(())
    }
}
