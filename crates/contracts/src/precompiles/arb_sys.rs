pub use IArbSys::IArbSysEvents as ArbSysEvent;

crate::sol! {
    /// Subset of the ArbSys precompile used for L2-to-L1 messaging.
    #[derive(Debug, PartialEq, Eq)]
    interface IArbSys {
        function arbChainID() external view returns (uint256);
        function arbBlockNumber() external view returns (uint256);

        /// Sends a message to `destination` on L1
        ///
        /// @return position Unique, strictly increasing id of the message
        function sendTxToL1(address destination, bytes calldata data) external payable returns (uint256 position);

        /// Alias under which an L1 contract appears as `msg.sender` on L2
        function mapL1SenderContractAddressToL2Alias(address sender, address unused) external pure returns (address);

        /// Whether the top-level caller is an aliased L1 contract
        function wasMyCallersAddressAliased() external view returns (bool);

        /// Top-level caller with any L1-to-L2 aliasing removed
        function myCallersAddressWithoutAliasing() external view returns (address);

        event L2ToL1Tx(address caller, address indexed destination, uint256 indexed position, uint256 arbBlockNum, bytes data);
    }
}
