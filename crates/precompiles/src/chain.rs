//! Single-threaded L2 ledger hosting the gateway precompiles.
//!
//! Every transaction runs inside a storage journal checkpoint: a revert (or a
//! halting error) undoes all storage writes and logs of the transaction,
//! across every contract it touched.

use std::collections::HashMap;

use alloy::{
    primitives::{Address, Bytes, Log, U256},
    sol_types::{SolCall, SolEvent},
};
use arb_gateway_contracts::precompiles::{
    ARB_SYS_ADDRESS, DEPOSITS_ENABLER_ROLE, IAccessControl, IL2ERC20TokenGateway,
    WITHDRAWALS_ENABLER_ROLE,
};
use tracing::{debug, info};

use crate::{
    Precompile, PrecompileOutput,
    address_aliasing::apply_l1_to_l2_alias,
    arb_sys::ArbSys,
    config::{ChainConfig, ConfigError},
    erc20_bridged::{ERC20Bridged, TokenMetadata},
    error::{GatewayPrecompileError, Result, decode_error},
    l2_erc20_gateway::{GatewayConfig, L2ERC20TokenGateway},
    metrics::GatewayMetrics,
    storage::{PrecompileStorageProvider, StorageCtx, TxEnv, hashmap::HashMapStorageProvider},
};

/// Contract deployed at an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    ArbSys,
    BridgedToken,
    Gateway(GatewayConfig),
}

/// Outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub success: bool,
    /// Return data, or revert data for a failed transaction.
    pub output: Bytes,
    /// Logs in emission order. Empty for a failed transaction.
    pub logs: Vec<Log>,
    pub block_number: u64,
}

impl Receipt {
    /// Typed revert reason of a failed transaction.
    pub fn revert_reason(&self) -> Option<GatewayPrecompileError> {
        if self.success {
            return None;
        }
        decode_error(&self.output)
            .or_else(|| Some(GatewayPrecompileError::MalformedInput("revert without data".into())))
    }

    /// Return data of a successful transaction, the decoded revert reason otherwise.
    pub fn into_result(self) -> Result<Bytes> {
        match self.revert_reason() {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }

    /// Every `E` emitted by `address`.
    pub fn events<E: SolEvent>(&self, address: Address) -> Vec<E> {
        self.logs
            .iter()
            .filter(|log| {
                log.address == address && log.data.topics().first() == Some(&E::SIGNATURE_HASH)
            })
            .filter_map(|log| E::decode_log_data(&log.data).ok())
            .collect()
    }

    fn count_events<E: SolEvent>(&self) -> u64 {
        self.logs
            .iter()
            .filter(|log| log.data.topics().first() == Some(&E::SIGNATURE_HASH))
            .count() as u64
    }
}

/// How a transaction's effects are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Commit,
    /// Executed and always rolled back, like `eth_call`.
    Simulate,
}

/// In-memory L2 chain with the ArbSys messenger pre-deployed.
#[derive(Debug)]
pub struct Chain {
    storage: HashMapStorageProvider,
    deployments: HashMap<Address, Deployment>,
    metrics: GatewayMetrics,
}

impl Chain {
    pub fn new(chain_id: u64) -> Self {
        let mut deployments = HashMap::new();
        deployments.insert(ARB_SYS_ADDRESS, Deployment::ArbSys);
        Self {
            storage: HashMapStorageProvider::new(chain_id),
            deployments,
            metrics: GatewayMetrics::default(),
        }
    }

    /// Deploys the token and gateway described by `config` and performs the
    /// admin's setup transactions.
    ///
    /// A gateway pointed at a non-canonical messenger gets one deployed there.
    pub fn from_config(config: &ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut chain = Self::new(config.chain_id);
        let gateway = config.gateway.address;
        let arb_sys = config.gateway.config.arb_sys;
        if arb_sys != ARB_SYS_ADDRESS {
            chain.deploy_arb_sys(arb_sys)?;
        }

        chain.deploy_bridged_token(
            config.token.address,
            &config.token.metadata,
            gateway,
            config
                .token
                .balances
                .iter()
                .map(|balance| (balance.account, balance.amount)),
        )?;
        chain.deploy_gateway(gateway, config.gateway.config.clone())?;

        chain
            .call(
                config.admin,
                gateway,
                IL2ERC20TokenGateway::initializeCall {
                    admin: config.admin,
                }
                .abi_encode(),
            )?
            .into_result()?;

        let gates = [
            (
                config.bridging.deposits_enabled,
                *DEPOSITS_ENABLER_ROLE,
                IL2ERC20TokenGateway::enableDepositsCall {}.abi_encode(),
            ),
            (
                config.bridging.withdrawals_enabled,
                *WITHDRAWALS_ENABLER_ROLE,
                IL2ERC20TokenGateway::enableWithdrawalsCall {}.abi_encode(),
            ),
        ];
        for (enabled, role, enable_calldata) in gates {
            if !enabled {
                continue;
            }
            chain
                .call(
                    config.admin,
                    gateway,
                    IAccessControl::grantRoleCall {
                        role,
                        account: config.admin,
                    }
                    .abi_encode(),
                )?
                .into_result()?;
            chain
                .call(config.admin, gateway, enable_calldata)?
                .into_result()?;
        }

        info!(chain_id = config.chain_id, %gateway, "chain initialized from config");
        Ok(chain)
    }

    pub fn storage(&self) -> &HashMapStorageProvider {
        &self.storage
    }

    pub fn block_number(&self) -> u64 {
        self.storage.block_number()
    }

    /// Deploys a bridged token controlled by `bridge` with initial `balances`.
    pub fn deploy_bridged_token(
        &mut self,
        address: Address,
        metadata: &TokenMetadata,
        bridge: Address,
        balances: impl IntoIterator<Item = (Address, U256)>,
    ) -> Result<()> {
        self.deploy(address, Deployment::BridgedToken, || {
            let mut token = ERC20Bridged::new(address);
            token.initialize(metadata, bridge)?;
            for (account, amount) in balances {
                token.mint(account, amount)?;
            }
            Ok(())
        })
    }

    /// Deploys an ArbSys messenger with its own message counter at `address`.
    pub fn deploy_arb_sys(&mut self, address: Address) -> Result<()> {
        self.deploy(address, Deployment::ArbSys, || Ok(()))
    }

    /// Deploys an uninitialized gateway.
    pub fn deploy_gateway(&mut self, address: Address, config: GatewayConfig) -> Result<()> {
        self.deploy(address, Deployment::Gateway(config), || Ok(()))
    }

    fn deploy(
        &mut self,
        address: Address,
        deployment: Deployment,
        constructor: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        if self.deployments.contains_key(&address) {
            return Err(GatewayPrecompileError::Fatal(format!(
                "address {address} already has code"
            )));
        }

        let checkpoint = self.storage.checkpoint();
        match StorageCtx::enter(&mut self.storage, constructor) {
            Ok(()) => self.storage.checkpoint_commit(checkpoint),
            Err(err) => {
                self.storage.checkpoint_revert(checkpoint);
                return Err(err);
            }
        }

        debug!(%address, ?deployment, "contract deployed");
        self.deployments.insert(address, deployment);
        Ok(())
    }

    /// Executes an L2 transaction from `from`.
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        calldata: impl AsRef<[u8]>,
    ) -> Result<Receipt> {
        let env = TxEnv {
            origin: from,
            is_l1_message: false,
        };
        self.execute(env, to, calldata.as_ref(), Mode::Commit)
    }

    /// Executes an L1-to-L2 message sent by the L1 contract `l1_sender`.
    ///
    /// The callee sees `msg.sender = alias(l1_sender)`.
    pub fn relay_from_l1(
        &mut self,
        l1_sender: Address,
        to: Address,
        calldata: impl AsRef<[u8]>,
    ) -> Result<Receipt> {
        let env = TxEnv {
            origin: apply_l1_to_l2_alias(l1_sender),
            is_l1_message: true,
        };
        self.execute(env, to, calldata.as_ref(), Mode::Commit)
    }

    /// Executes a transaction and discards all of its effects.
    pub fn simulate(
        &mut self,
        from: Address,
        to: Address,
        calldata: impl AsRef<[u8]>,
    ) -> Result<Receipt> {
        let env = TxEnv {
            origin: from,
            is_l1_message: false,
        };
        self.execute(env, to, calldata.as_ref(), Mode::Simulate)
    }

    /// Runs a read-only call and decodes its return value.
    pub fn read<C: SolCall>(&mut self, to: Address, call: &C) -> Result<C::Return> {
        let output = self
            .simulate(Address::ZERO, to, call.abi_encode())?
            .into_result()?;
        C::abi_decode_returns(&output)
            .map_err(|err| GatewayPrecompileError::MalformedInput(err.to_string()))
    }

    fn execute(&mut self, env: TxEnv, to: Address, calldata: &[u8], mode: Mode) -> Result<Receipt> {
        let parent_block = self.storage.block_number();
        let block_number = parent_block + 1;
        self.storage.set_block_number(block_number);
        self.storage.set_tx_env(env);

        debug!(from = %env.origin, %to, block_number, ?mode, "executing transaction");

        let checkpoint = self.storage.checkpoint();
        let deployment = self.deployments.get(&to);
        let from = env.origin;
        let result = StorageCtx::enter(&mut self.storage, || match deployment {
            None => Ok(PrecompileOutput::default()),
            Some(Deployment::ArbSys) => ArbSys::at(to).call(calldata, from),
            Some(Deployment::BridgedToken) => ERC20Bridged::new(to).call(calldata, from),
            Some(Deployment::Gateway(config)) => {
                L2ERC20TokenGateway::new(to, config.clone()).call(calldata, from)
            }
        });

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                self.storage.checkpoint_revert(checkpoint);
                self.storage.set_block_number(parent_block);
                return Err(err);
            }
        };

        let success = !output.reverted;
        let logs = if success {
            self.storage.logs_since(checkpoint)
        } else {
            Vec::new()
        };
        let receipt = Receipt {
            success,
            output: output.bytes,
            logs,
            block_number,
        };

        match mode {
            Mode::Commit if success => {
                self.storage.checkpoint_commit(checkpoint);
                self.metrics.record_committed();
                self.metrics.record_withdrawals(
                    receipt.count_events::<IL2ERC20TokenGateway::WithdrawalInitiated>(),
                );
                self.metrics.record_deposits(
                    receipt.count_events::<IL2ERC20TokenGateway::DepositFinalized>(),
                );
            }
            Mode::Commit => {
                self.storage.checkpoint_revert(checkpoint);
                self.metrics.record_reverted();
                debug!(
                    from = %env.origin,
                    %to,
                    reason = ?receipt.revert_reason(),
                    "transaction reverted"
                );
            }
            Mode::Simulate => {
                self.storage.checkpoint_revert(checkpoint);
                self.storage.set_block_number(parent_block);
            }
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_gateway_contracts::precompiles::{IArbSys, IERC20Bridged};

    const TOKEN: Address = Address::new([0x22; 20]);
    const BRIDGE: Address = Address::new([0x6a; 20]);

    fn chain_with_token() -> Result<Chain> {
        let mut chain = Chain::new(42161);
        chain.deploy_bridged_token(
            TOKEN,
            &TokenMetadata {
                name: "Bridged".into(),
                symbol: "BRD".into(),
                decimals: 18,
            },
            BRIDGE,
            [(Address::repeat_byte(0xa1), U256::from(100))],
        )?;
        Ok(chain)
    }

    #[test]
    fn test_unknown_address_is_an_eoa() -> eyre::Result<()> {
        let mut chain = Chain::new(1);
        let receipt = chain.call(Address::repeat_byte(1), Address::repeat_byte(2), [0xde_u8, 0xad])?;
        assert!(receipt.success);
        assert!(receipt.output.is_empty());
        assert_eq!(receipt.block_number, 1);
        Ok(())
    }

    #[test]
    fn test_revert_rolls_back_whole_transaction() -> eyre::Result<()> {
        let mut chain = chain_with_token()?;
        let alice = Address::repeat_byte(0xa1);

        let receipt = chain.call(
            alice,
            TOKEN,
            IERC20Bridged::transferCall {
                to: Address::repeat_byte(0xb0),
                amount: U256::from(101),
            }
            .abi_encode(),
        )?;
        assert!(!receipt.success);
        assert!(receipt.logs.is_empty());
        assert_eq!(
            chain.read(TOKEN, &IERC20Bridged::balanceOfCall { account: alice })?,
            U256::from(100)
        );
        Ok(())
    }

    #[test]
    fn test_simulate_discards_effects() -> eyre::Result<()> {
        let mut chain = chain_with_token()?;
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);

        let receipt = chain.simulate(
            alice,
            TOKEN,
            IERC20Bridged::transferCall {
                to: bob,
                amount: U256::from(10),
            }
            .abi_encode(),
        )?;
        assert!(receipt.success);
        assert_eq!(receipt.events::<IERC20Bridged::Transfer>(TOKEN).len(), 1);
        assert_eq!(chain.block_number(), 0);
        assert_eq!(
            chain.read(TOKEN, &IERC20Bridged::balanceOfCall { account: bob })?,
            U256::ZERO
        );
        Ok(())
    }

    #[test]
    fn test_relay_marks_caller_as_aliased() -> eyre::Result<()> {
        let mut chain = Chain::new(1);
        let l1_sender = Address::repeat_byte(0x11);

        let receipt = chain.relay_from_l1(
            l1_sender,
            ARB_SYS_ADDRESS,
            IArbSys::myCallersAddressWithoutAliasingCall {}.abi_encode(),
        )?;
        let caller = IArbSys::myCallersAddressWithoutAliasingCall::abi_decode_returns(
            &receipt.into_result()?,
        )?;
        assert_eq!(caller, l1_sender);
        Ok(())
    }

    #[test]
    fn test_block_number_increments_per_transaction() -> eyre::Result<()> {
        let mut chain = Chain::new(1);
        for expected in 1..=3 {
            let receipt = chain.call(
                Address::ZERO,
                ARB_SYS_ADDRESS,
                IArbSys::arbBlockNumberCall {}.abi_encode(),
            )?;
            let block = IArbSys::arbBlockNumberCall::abi_decode_returns(&receipt.into_result()?)?;
            assert_eq!(block, U256::from(expected));
        }
        assert_eq!(chain.block_number(), 3);
        Ok(())
    }

    #[test]
    fn test_double_deploy_is_rejected() -> eyre::Result<()> {
        let mut chain = chain_with_token()?;
        let err = chain
            .deploy_gateway(
                TOKEN,
                GatewayConfig {
                    l1_token: Address::ZERO,
                    l2_token: TOKEN,
                    counterpart_gateway: Address::ZERO,
                    router: Address::ZERO,
                    arb_sys: ARB_SYS_ADDRESS,
                },
            )
            .unwrap_err();
        assert!(err.is_fatal());
        Ok(())
    }
}
