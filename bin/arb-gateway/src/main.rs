use clap::Parser;
use opts::{GatewayCli, GatewaySubcommand};

mod cmd;
mod opts;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = GatewayCli::parse();

    match args.cmd {
        GatewaySubcommand::Alias(cmd) => cmd.run(),
        GatewaySubcommand::Calldata(cmd) => cmd.run(),
        GatewaySubcommand::DecodeError(cmd) => cmd.run(),
        GatewaySubcommand::Simulate(cmd) => cmd.run(),
    }
}
