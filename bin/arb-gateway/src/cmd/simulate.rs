use std::{collections::BTreeSet, path::PathBuf};

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use arb_gateway_contracts::precompiles::{IERC20Bridged, IL2ERC20TokenGateway};
use arb_gateway_precompiles::{Chain, ChainConfig, Receipt, config::ScriptedTransfer};
use clap::{Parser, ValueEnum};
use eyre::Result;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
pub(crate) struct SimulateArgs {
    /// Path to the chain config file
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Report {
    transfers: Vec<TransferOutcome>,
    balances: Vec<Balance>,
    total_supply: String,
}

#[derive(Debug, Serialize)]
struct TransferOutcome {
    kind: &'static str,
    from: Address,
    to: Address,
    amount: String,
    block: u64,
    success: bool,
    /// Withdrawal message id, or the revert reason of a failed transfer.
    detail: String,
}

#[derive(Debug, Serialize)]
struct Balance {
    account: Address,
    amount: String,
}

impl SimulateArgs {
    pub(crate) fn run(self) -> Result<()> {
        let config = ChainConfig::load(&self.config)?;
        let mut chain = Chain::from_config(&config)?;
        let gateway = config.gateway.address;
        let l1_token = config.gateway.config.l1_token;
        let counterpart = config.gateway.config.counterpart_gateway;

        let mut transfers = Vec::new();
        for deposit in &config.deposits {
            let receipt = chain.relay_from_l1(
                counterpart,
                gateway,
                IL2ERC20TokenGateway::finalizeInboundTransferCall {
                    l1Token: l1_token,
                    from: deposit.from,
                    to: deposit.to,
                    amount: deposit.amount,
                    data: Bytes::new(),
                }
                .abi_encode(),
            )?;
            transfers.push(TransferOutcome::new("deposit", deposit, receipt, |_| {
                Ok(String::new())
            })?);
        }

        for withdrawal in &config.withdrawals {
            let receipt = chain.call(
                withdrawal.from,
                gateway,
                IL2ERC20TokenGateway::outboundTransferCall {
                    l1Token: l1_token,
                    to: withdrawal.to,
                    amount: withdrawal.amount,
                    maxGas: U256::ZERO,
                    gasPriceBid: U256::ZERO,
                    data: Bytes::new(),
                }
                .abi_encode(),
            )?;
            transfers.push(TransferOutcome::new("withdrawal", withdrawal, receipt, |output| {
                let res = IL2ERC20TokenGateway::outboundTransferCall::abi_decode_returns(output)?;
                Ok(format!("id {}", U256::abi_decode(&res)?))
            })?);
        }

        let token = config.token.address;
        let accounts: BTreeSet<Address> = config
            .token
            .balances
            .iter()
            .map(|balance| balance.account)
            .chain(config.deposits.iter().map(|deposit| deposit.to))
            .chain(config.withdrawals.iter().map(|withdrawal| withdrawal.from))
            .collect();
        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let amount = chain.read(token, &IERC20Bridged::balanceOfCall { account })?;
            balances.push(Balance {
                account,
                amount: amount.to_string(),
            });
        }
        let total_supply = chain.read(token, &IERC20Bridged::totalSupplyCall {})?;

        let report = Report {
            transfers,
            balances,
            total_supply: total_supply.to_string(),
        };
        info!(
            transfers = report.transfers.len(),
            failed = report.transfers.iter().filter(|t| !t.success).count(),
            "simulation finished"
        );

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => report.print_table(&config.token.metadata.symbol),
        }
        Ok(())
    }
}

impl TransferOutcome {
    fn new(
        kind: &'static str,
        transfer: &ScriptedTransfer,
        receipt: Receipt,
        describe: impl FnOnce(&Bytes) -> Result<String>,
    ) -> Result<Self> {
        let detail = match receipt.revert_reason() {
            Some(reason) => reason.to_string(),
            None => describe(&receipt.output)?,
        };
        Ok(Self {
            kind,
            from: transfer.from,
            to: transfer.to,
            amount: transfer.amount.to_string(),
            block: receipt.block_number,
            success: receipt.success,
            detail,
        })
    }
}

impl Report {
    fn print_table(&self, symbol: &str) {
        println!("Transfers");
        println!("=========");
        println!();
        if self.transfers.is_empty() {
            println!("  (none)");
        }
        for transfer in &self.transfers {
            let status = if transfer.success { "ok" } else { "reverted" };
            println!(
                "  #{:<4} {:<10} {} -> {}  {} {symbol}  [{status}] {}",
                transfer.block,
                transfer.kind,
                transfer.from,
                transfer.to,
                transfer.amount,
                transfer.detail
            );
        }
        println!();

        println!("Balances");
        println!("========");
        println!();
        for balance in &self.balances {
            println!("  {}  {} {symbol}", balance.account, balance.amount);
        }
        println!();
        println!("Total supply: {} {symbol}", self.total_supply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_table() -> Result<()> {
        let args = SimulateArgs::try_parse_from(["simulate", "--config", "gateway.toml"])?;
        assert_eq!(args.format, OutputFormat::Table);

        let args = SimulateArgs::try_parse_from(["simulate", "-f", "json"])?;
        assert_eq!(args.format, OutputFormat::Json);
        Ok(())
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = SimulateArgs::try_parse_from(["simulate", "--format", "yaml"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
