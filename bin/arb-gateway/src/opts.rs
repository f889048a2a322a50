use crate::cmd::{
    alias::AliasArgs, calldata::CalldataArgs, decode_error::DecodeErrorArgs,
    simulate::SimulateArgs,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "arb-gateway")]
#[command(version, about = "CLI for the L2 token gateway", long_about = None)]
pub(crate) struct GatewayCli {
    #[command(subcommand)]
    pub(crate) cmd: GatewaySubcommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum GatewaySubcommand {
    /// Convert an L1 address to its L2 alias (or back)
    Alias(AliasArgs),

    /// Print the message a withdrawal sends to the L1 gateway
    Calldata(CalldataArgs),

    /// Decode gateway revert data
    DecodeError(DecodeErrorArgs),

    /// Replay the deposits and withdrawals of a config on an in-memory chain
    Simulate(SimulateArgs),
}
