use std::sync::LazyLock;

use alloy_primitives::{B256, keccak256};

pub use IL2ERC20TokenGateway::{
    IL2ERC20TokenGatewayErrors as L2TokenGatewayError,
    IL2ERC20TokenGatewayEvents as L2TokenGatewayEvent,
};

crate::sol! {
    /// L2 side of a custom-token gateway pair.
    ///
    /// Withdrawals burn the bridged token on L2 and send a `finalizeInboundTransfer`
    /// message to the counterpart gateway on L1 through ArbSys. Deposits arrive from
    /// the (aliased) counterpart gateway and mint the bridged token on L2. Each
    /// direction can be switched on and off independently by role holders.
    #[derive(Debug, PartialEq, Eq)]
    interface IL2ERC20TokenGateway {
        /// Address of the canonical token on L1
        function l1Token() external view returns (address);

        /// Address of the bridged token on L2
        function l2Token() external view returns (address);

        /// Address of the peer gateway on L1
        function counterpartGateway() external view returns (address);

        /// Address of the trusted gateway router on L2
        function router() external view returns (address);

        /// Returns `l2Token` for the supported L1 token and the zero address otherwise
        ///
        /// @param l1ERC20 Candidate L1 token address
        function calculateL2TokenAddress(address l1ERC20) external view returns (address);

        /// Calldata sent to the counterpart gateway for a withdrawal
        function getOutboundCalldata(
            address l1Token,
            address from,
            address to,
            uint256 amount,
            bytes calldata data
        ) external view returns (bytes memory);

        /// Initiates a withdrawal of `amount` bridged tokens to `to` on L1
        ///
        /// @param l1Token Address of the L1 token, must be the supported one
        /// @param to Recipient on L1
        /// @param amount Amount of tokens to withdraw
        /// @param maxGas Unused on L2, kept for interface compatibility
        /// @param gasPriceBid Unused on L2, kept for interface compatibility
        /// @param data Empty for direct calls, `abi.encode(sender, extraData)` from the router
        /// @return res ABI-encoded id of the L2-to-L1 message
        function outboundTransfer(
            address l1Token,
            address to,
            uint256 amount,
            uint256 maxGas,
            uint256 gasPriceBid,
            bytes calldata data
        ) external payable returns (bytes memory res);

        /// Completes a deposit started on L1 by minting bridged tokens to `to`
        function finalizeInboundTransfer(
            address l1Token,
            address from,
            address to,
            uint256 amount,
            bytes calldata data
        ) external payable;

        /// One-time setup of the role administrator
        function initialize(address admin) external;
        function isInitialized() external view returns (bool);

        function isDepositsEnabled() external view returns (bool);
        function isWithdrawalsEnabled() external view returns (bool);
        function enableDeposits() external;
        function disableDeposits() external;
        function enableWithdrawals() external;
        function disableWithdrawals() external;

        function DEPOSITS_ENABLER_ROLE() external view returns (bytes32);
        function DEPOSITS_DISABLER_ROLE() external view returns (bytes32);
        function WITHDRAWALS_ENABLER_ROLE() external view returns (bytes32);
        function WITHDRAWALS_DISABLER_ROLE() external view returns (bytes32);

        // Events
        event DepositFinalized(address indexed l1Token, address indexed from, address indexed to, uint256 amount);
        event WithdrawalInitiated(address l1Token, address indexed from, address indexed to, uint256 indexed l2ToL1Id, uint256 exitNum, uint256 amount);
        event TxToL1(address indexed from, address indexed to, uint256 indexed id, bytes data);
        event Initialized(address indexed admin);
        event DepositsEnabled(address indexed enabler);
        event DepositsDisabled(address indexed disabler);
        event WithdrawalsEnabled(address indexed enabler);
        event WithdrawalsDisabled(address indexed disabler);

        // Errors
        error ErrorUnsupportedL1Token();
        error ErrorWrongCrossDomainSender();
        error ErrorDepositsDisabled();
        error ErrorWithdrawalsDisabled();
        error ErrorAlreadyInitialized();
        error ExtraDataNotEmpty();
    }
}

/// Role allowed to switch deposits on.
pub static DEPOSITS_ENABLER_ROLE: LazyLock<B256> =
    LazyLock::new(|| keccak256("BridgingManager.DEPOSITS_ENABLER_ROLE"));

/// Role allowed to switch deposits off.
pub static DEPOSITS_DISABLER_ROLE: LazyLock<B256> =
    LazyLock::new(|| keccak256("BridgingManager.DEPOSITS_DISABLER_ROLE"));

/// Role allowed to switch withdrawals on.
pub static WITHDRAWALS_ENABLER_ROLE: LazyLock<B256> =
    LazyLock::new(|| keccak256("BridgingManager.WITHDRAWALS_ENABLER_ROLE"));

/// Role allowed to switch withdrawals off.
pub static WITHDRAWALS_DISABLER_ROLE: LazyLock<B256> =
    LazyLock::new(|| keccak256("BridgingManager.WITHDRAWALS_DISABLER_ROLE"));

/// Base slot of the bridging state struct `{isInitialized, isDepositsEnabled, isWithdrawalsEnabled}`.
pub static BRIDGING_STATE_POSITION: LazyLock<B256> =
    LazyLock::new(|| keccak256("BridgingManager.bridgingState"));

impl L2TokenGatewayError {
    pub const fn unsupported_l1_token() -> Self {
        Self::ErrorUnsupportedL1Token(IL2ERC20TokenGateway::ErrorUnsupportedL1Token {})
    }

    pub const fn wrong_cross_domain_sender() -> Self {
        Self::ErrorWrongCrossDomainSender(IL2ERC20TokenGateway::ErrorWrongCrossDomainSender {})
    }

    pub const fn deposits_disabled() -> Self {
        Self::ErrorDepositsDisabled(IL2ERC20TokenGateway::ErrorDepositsDisabled {})
    }

    pub const fn withdrawals_disabled() -> Self {
        Self::ErrorWithdrawalsDisabled(IL2ERC20TokenGateway::ErrorWithdrawalsDisabled {})
    }

    pub const fn already_initialized() -> Self {
        Self::ErrorAlreadyInitialized(IL2ERC20TokenGateway::ErrorAlreadyInitialized {})
    }

    pub const fn extra_data_nonempty() -> Self {
        Self::ExtraDataNotEmpty(IL2ERC20TokenGateway::ExtraDataNotEmpty {})
    }
}
