pub mod bridging;
pub mod dispatch;
pub mod transfer;

pub use bridging::{BridgingState, Gate};
pub use transfer::{InboundTransfer, OutboundTransfer};

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};
use arb_gateway_contracts::precompiles::{
    ARB_SYS_ADDRESS, IArbSys, IERC20Bridged, IL2ERC20TokenGateway, L2TokenGatewayError,
    L2TokenGatewayEvent,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    access_control::{AccessControl, RolePolicy},
    address_aliasing::apply_l1_to_l2_alias,
    arb_sys::ArbSys,
    erc20_bridged::ERC20Bridged,
    error::Result,
    storage::{ContractStorage, StorageCtx},
};

/// Addresses fixed when the gateway is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// Canonical token on L1. The only token this gateway bridges.
    pub l1_token: Address,
    /// Bridged token on L2, minted and burned by this gateway.
    pub l2_token: Address,
    /// Peer gateway on L1.
    pub counterpart_gateway: Address,
    /// Trusted router allowed to withdraw on behalf of other accounts.
    pub router: Address,
    /// L2-to-L1 messenger.
    #[serde(default = "default_arb_sys")]
    pub arb_sys: Address,
}

fn default_arb_sys() -> Address {
    ARB_SYS_ADDRESS
}

/// L2 half of a custom-token gateway pair.
///
/// Generic over the [`RolePolicy`] guarding the bridging gates. The default is
/// an [`AccessControl`] registry stored at the gateway's own address.
#[derive(Debug)]
pub struct L2ERC20TokenGateway<P = AccessControl> {
    address: Address,
    config: GatewayConfig,
    roles: P,
    bridging: BridgingState,
    storage: StorageCtx,
}

impl L2ERC20TokenGateway<AccessControl> {
    pub fn new(address: Address, config: GatewayConfig) -> Self {
        Self::with_roles(address, config, AccessControl::new(address))
    }
}

impl<P: RolePolicy> L2ERC20TokenGateway<P> {
    pub fn with_roles(address: Address, config: GatewayConfig, roles: P) -> Self {
        Self {
            address,
            config,
            roles,
            bridging: BridgingState::new(address),
            storage: StorageCtx,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn roles(&self) -> &P {
        &self.roles
    }

    /// `l2Token` for the bridged L1 token, the zero address for anything else.
    pub fn calculate_l2_token_address(&self, l1_token: Address) -> Address {
        if l1_token == self.config.l1_token {
            self.config.l2_token
        } else {
            Address::ZERO
        }
    }

    pub fn get_outbound_calldata(
        &self,
        call: IL2ERC20TokenGateway::getOutboundCalldataCall,
    ) -> Bytes {
        OutboundTransfer {
            l1_token: call.l1Token,
            from: call.from,
            to: call.to,
            amount: call.amount,
            extra_data: call.data,
        }
        .finalize_calldata()
    }

    /// Burns the sender's bridged tokens and asks the counterpart gateway to
    /// release them on L1. Returns `abi.encode(id)` of the L2-to-L1 message.
    pub fn outbound_transfer(
        &mut self,
        sender: Address,
        call: IL2ERC20TokenGateway::outboundTransferCall,
    ) -> Result<Bytes> {
        if !self.is_withdrawals_enabled()? {
            return Err(L2TokenGatewayError::withdrawals_disabled().into());
        }
        self.ensure_supported_l1_token(call.l1Token)?;

        let transfer = OutboundTransfer::resolve(sender, self.config.router, call)?;
        transfer.ensure_no_extra_data()?;

        ERC20Bridged::new(self.config.l2_token).bridge_burn(
            self.address,
            IERC20Bridged::bridgeBurnCall {
                account: transfer.from,
                amount: transfer.amount,
            },
        )?;

        let payload = transfer.finalize_calldata();
        let id = self.send_cross_domain_message(transfer.from, payload)?;

        debug!(
            gateway = %self.address,
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            %id,
            "withdrawal initiated"
        );
        self.emit_event(L2TokenGatewayEvent::WithdrawalInitiated(
            IL2ERC20TokenGateway::WithdrawalInitiated {
                l1Token: transfer.l1_token,
                from: transfer.from,
                to: transfer.to,
                l2ToL1Id: id,
                exitNum: U256::ZERO,
                amount: transfer.amount,
            },
        ))?;

        Ok(id.abi_encode().into())
    }

    /// Mints bridged tokens for a deposit relayed from the counterpart gateway.
    pub fn finalize_inbound_transfer(
        &mut self,
        sender: Address,
        call: IL2ERC20TokenGateway::finalizeInboundTransferCall,
    ) -> Result<()> {
        let transfer = InboundTransfer::from(call);

        if !self.is_deposits_enabled()? {
            return Err(L2TokenGatewayError::deposits_disabled().into());
        }
        self.ensure_supported_l1_token(transfer.l1_token)?;
        if sender != apply_l1_to_l2_alias(self.config.counterpart_gateway) {
            return Err(L2TokenGatewayError::wrong_cross_domain_sender().into());
        }

        ERC20Bridged::new(self.config.l2_token).bridge_mint(
            self.address,
            IERC20Bridged::bridgeMintCall {
                account: transfer.to,
                amount: transfer.amount,
            },
        )?;

        debug!(
            gateway = %self.address,
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            "deposit finalized"
        );
        self.emit_event(L2TokenGatewayEvent::DepositFinalized(
            IL2ERC20TokenGateway::DepositFinalized {
                l1Token: transfer.l1_token,
                from: transfer.from,
                to: transfer.to,
                amount: transfer.amount,
            },
        ))
    }

    fn ensure_supported_l1_token(&self, l1_token: Address) -> Result<()> {
        if l1_token != self.config.l1_token {
            return Err(L2TokenGatewayError::unsupported_l1_token().into());
        }
        Ok(())
    }

    /// Sends `data` to the counterpart gateway through ArbSys and emits `TxToL1`.
    fn send_cross_domain_message(&mut self, from: Address, data: Bytes) -> Result<U256> {
        let to = self.config.counterpart_gateway;
        let id = ArbSys::at(self.config.arb_sys).send_tx_to_l1(
            self.address,
            IArbSys::sendTxToL1Call {
                destination: to,
                data: data.clone(),
            },
        )?;

        self.emit_event(L2TokenGatewayEvent::TxToL1(IL2ERC20TokenGateway::TxToL1 {
            from,
            to,
            id,
            data,
        }))?;
        Ok(id)
    }
}

impl<P> ContractStorage for L2ERC20TokenGateway<P> {
    fn address(&self) -> Address {
        self.address
    }

    fn storage(&mut self) -> &mut StorageCtx {
        &mut self.storage
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        error::GatewayPrecompileError,
        erc20_bridged::TokenMetadata,
        storage::hashmap::HashMapStorageProvider,
    };
    use alloy::{primitives::B256, sol_types::SolEvent};
    use arb_gateway_contracts::precompiles::{
        DEFAULT_ADMIN_ROLE, DEPOSITS_ENABLER_ROLE, IAccessControl, WITHDRAWALS_ENABLER_ROLE,
    };

    const GATEWAY: Address = Address::new([0x6a; 20]);
    const ADMIN: Address = Address::new([0xad; 20]);

    pub(crate) fn test_config() -> GatewayConfig {
        GatewayConfig {
            l1_token: Address::repeat_byte(0x11),
            l2_token: Address::repeat_byte(0x22),
            counterpart_gateway: Address::repeat_byte(0x33),
            router: Address::repeat_byte(0x44),
            arb_sys: ARB_SYS_ADDRESS,
        }
    }

    /// Gateway with both gates open and its token deployed.
    fn open_gateway() -> Result<L2ERC20TokenGateway> {
        let config = test_config();
        ERC20Bridged::new(config.l2_token).initialize(
            &TokenMetadata {
                name: "Bridged".into(),
                symbol: "BRD".into(),
                decimals: 18,
            },
            GATEWAY,
        )?;

        let mut gateway = L2ERC20TokenGateway::new(GATEWAY, config);
        gateway.initialize(ADMIN, IL2ERC20TokenGateway::initializeCall { admin: ADMIN })?;
        for role in [*DEPOSITS_ENABLER_ROLE, *WITHDRAWALS_ENABLER_ROLE] {
            gateway
                .roles
                .grant_role(ADMIN, IAccessControl::grantRoleCall { role, account: ADMIN })?;
        }
        gateway.enable_deposits(ADMIN)?;
        gateway.enable_withdrawals(ADMIN)?;
        Ok(gateway)
    }

    fn withdraw_call(l1_token: Address, amount: U256, data: Bytes) -> IL2ERC20TokenGateway::outboundTransferCall {
        IL2ERC20TokenGateway::outboundTransferCall {
            l1Token: l1_token,
            to: Address::repeat_byte(0x7e),
            amount,
            maxGas: U256::ZERO,
            gasPriceBid: U256::ZERO,
            data,
        }
    }

    #[test]
    fn test_calculate_l2_token_address() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        StorageCtx::enter(&mut storage, || {
            let gateway = L2ERC20TokenGateway::new(GATEWAY, test_config());
            let config = test_config();

            assert_eq!(gateway.calculate_l2_token_address(config.l1_token), config.l2_token);
            assert_eq!(gateway.calculate_l2_token_address(Address::ZERO), Address::ZERO);
            assert_eq!(gateway.calculate_l2_token_address(config.l2_token), Address::ZERO);
            Ok(())
        })
    }

    #[test]
    fn test_withdrawal_burns_and_messages() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let sender = Address::repeat_byte(0x5e);
        let config = test_config();

        let res = StorageCtx::enter(&mut storage, || -> Result<Bytes> {
            let mut gateway = open_gateway()?;
            let mut token = ERC20Bridged::new(config.l2_token);
            token.mint(sender, U256::from(100))?;

            let res = gateway.outbound_transfer(
                sender,
                withdraw_call(config.l1_token, U256::from(60), Bytes::new()),
            )?;
            assert_eq!(token.balance_of(sender)?, U256::from(40));
            assert_eq!(token.total_supply()?, U256::from(40));
            Ok(res)
        })?;
        assert_eq!(U256::abi_decode(&res)?, U256::from(1));

        let events = storage.get_events(GATEWAY);
        let n = events.len();
        let tx_to_l1 = IL2ERC20TokenGateway::TxToL1::decode_log_data(&events[n - 2])?;
        let initiated = IL2ERC20TokenGateway::WithdrawalInitiated::decode_log_data(&events[n - 1])?;
        assert_eq!(tx_to_l1.from, sender);
        assert_eq!(tx_to_l1.to, config.counterpart_gateway);
        assert_eq!(tx_to_l1.id, initiated.l2ToL1Id);
        assert_eq!(initiated.from, sender);
        assert_eq!(initiated.exitNum, U256::ZERO);
        assert_eq!(initiated.amount, U256::from(60));
        Ok(())
    }

    #[test]
    fn test_withdrawal_checks_run_in_order() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let sender = Address::repeat_byte(0x5e);

        StorageCtx::enter(&mut storage, || -> eyre::Result<()> {
            let mut gateway = L2ERC20TokenGateway::new(GATEWAY, test_config());
            // Closed gate wins over an unsupported token and extra data.
            let err = gateway
                .outbound_transfer(
                    sender,
                    withdraw_call(Address::ZERO, U256::from(1), Bytes::from_static(b"x")),
                )
                .unwrap_err();
            assert_eq!(
                err,
                GatewayPrecompileError::from(L2TokenGatewayError::withdrawals_disabled())
            );

            let mut gateway = open_gateway()?;
            let err = gateway
                .outbound_transfer(
                    sender,
                    withdraw_call(Address::ZERO, U256::from(1), Bytes::from_static(b"x")),
                )
                .unwrap_err();
            assert_eq!(
                err,
                GatewayPrecompileError::from(L2TokenGatewayError::unsupported_l1_token())
            );

            let err = gateway
                .outbound_transfer(
                    sender,
                    withdraw_call(test_config().l1_token, U256::from(1), Bytes::from_static(b"x")),
                )
                .unwrap_err();
            assert_eq!(
                err,
                GatewayPrecompileError::from(L2TokenGatewayError::extra_data_nonempty())
            );
            Ok(())
        })
    }

    #[test]
    fn test_deposit_from_aliased_counterpart() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let config = test_config();
        let recipient = Address::repeat_byte(0x7e);
        let relayer = apply_l1_to_l2_alias(config.counterpart_gateway);

        StorageCtx::enter(&mut storage, || -> eyre::Result<()> {
            let mut gateway = open_gateway()?;
            let call = IL2ERC20TokenGateway::finalizeInboundTransferCall {
                l1Token: config.l1_token,
                from: Address::repeat_byte(0x1f),
                to: recipient,
                amount: U256::from(10),
                data: Bytes::new(),
            };

            // The raw L1 address is not the relayer.
            let err = gateway
                .finalize_inbound_transfer(config.counterpart_gateway, call.clone())
                .unwrap_err();
            assert_eq!(
                err,
                GatewayPrecompileError::from(L2TokenGatewayError::wrong_cross_domain_sender())
            );

            gateway.finalize_inbound_transfer(relayer, call)?;
            assert_eq!(
                ERC20Bridged::new(config.l2_token).balance_of(recipient)?,
                U256::from(10)
            );
            Ok(())
        })?;

        let events = storage.get_events(GATEWAY);
        let finalized =
            IL2ERC20TokenGateway::DepositFinalized::decode_log_data(events.last().expect("event"))?;
        assert_eq!(finalized.to, recipient);
        assert_eq!(finalized.amount, U256::from(10));
        Ok(())
    }

    #[test]
    fn test_custom_role_policy() -> eyre::Result<()> {
        /// Grants every role to a single operator.
        struct Operator(Address);

        impl crate::Precompile for Operator {
            fn call(&mut self, _: &[u8], _: Address) -> crate::PrecompileResult {
                Ok(Default::default())
            }
        }

        impl RolePolicy for Operator {
            fn has_role(&self, _role: B256, account: Address) -> Result<bool> {
                Ok(account == self.0)
            }

            fn setup_role(&mut self, _: B256, _: Address, _: Address) -> Result<()> {
                Ok(())
            }
        }

        let mut storage = HashMapStorageProvider::new(1);
        let operator = Address::repeat_byte(0x0b);

        StorageCtx::enter(&mut storage, || -> eyre::Result<()> {
            let mut gateway =
                L2ERC20TokenGateway::with_roles(GATEWAY, test_config(), Operator(operator));
            gateway.enable_withdrawals(operator)?;
            assert!(gateway.is_withdrawals_enabled()?);
            assert!(gateway.enable_deposits(ADMIN).is_err());
            assert!(!gateway.roles().has_role(DEFAULT_ADMIN_ROLE, ADMIN)?);
            Ok(())
        })
    }
}
