//! ABI bindings for the Arbitrum-style L2 token gateway and its collaborators.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod precompiles;

pub use alloy_sol_types::sol;
