use alloy_primitives::B256;

pub use IAccessControl::{
    IAccessControlErrors as AccessControlError, IAccessControlEvents as AccessControlEvent,
};

crate::sol! {
    /// Role-based access control shared by gateway contracts
    #[derive(Debug, PartialEq, Eq)]
    interface IAccessControl {
        function DEFAULT_ADMIN_ROLE() external view returns (bytes32);
        function hasRole(bytes32 role, address account) external view returns (bool);
        function getRoleAdmin(bytes32 role) external view returns (bytes32);
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
        function renounceRole(bytes32 role, address callerConfirmation) external;

        // Events
        event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole);
        event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender);
        event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender);

        // Errors
        error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
        error AccessControlBadConfirmation();
    }
}

/// Admin of every role unless reassigned.
pub const DEFAULT_ADMIN_ROLE: B256 = B256::ZERO;

impl AccessControlError {
    pub const fn unauthorized_account(account: alloy_primitives::Address, needed_role: B256) -> Self {
        Self::AccessControlUnauthorizedAccount(IAccessControl::AccessControlUnauthorizedAccount {
            account,
            neededRole: needed_role,
        })
    }

    pub const fn bad_confirmation() -> Self {
        Self::AccessControlBadConfirmation(IAccessControl::AccessControlBadConfirmation {})
    }
}
