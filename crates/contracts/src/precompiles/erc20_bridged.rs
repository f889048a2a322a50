pub use IERC20Bridged::{
    IERC20BridgedErrors as ERC20BridgedError, IERC20BridgedEvents as ERC20BridgedEvent,
};

crate::sol! {
    /// ERC-20 token whose supply on L2 is controlled by a single bridge.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20Bridged {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        /// Address allowed to mint and burn tokens
        function bridge() external view returns (address);

        /// Creates `amount` tokens for `account`. Only callable by the bridge
        function bridgeMint(address account, uint256 amount) external;

        /// Destroys `amount` tokens of `account`. Only callable by the bridge
        function bridgeBurn(address account, uint256 amount) external;

        // Events
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        // Errors
        error ErrorNotBridge();
        error ErrorAccountIsZeroAddress();
        error ErrorNotEnoughBalance();
        error ErrorNotEnoughAllowance();
    }
}

impl ERC20BridgedError {
    pub const fn not_bridge() -> Self {
        Self::ErrorNotBridge(IERC20Bridged::ErrorNotBridge {})
    }

    pub const fn account_is_zero_address() -> Self {
        Self::ErrorAccountIsZeroAddress(IERC20Bridged::ErrorAccountIsZeroAddress {})
    }

    pub const fn not_enough_balance() -> Self {
        Self::ErrorNotEnoughBalance(IERC20Bridged::ErrorNotEnoughBalance {})
    }

    pub const fn not_enough_allowance() -> Self {
        Self::ErrorNotEnoughAllowance(IERC20Bridged::ErrorNotEnoughAllowance {})
    }
}
