//! Arbitrum-style L2 token gateway implemented as native precompiles.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address_aliasing;
pub mod chain;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod storage;

pub mod access_control;
pub mod arb_sys;
pub mod erc20_bridged;
pub mod l2_erc20_gateway;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_util;

pub use runtime::*;

pub use access_control::{AccessControl, RolePolicy};
pub use arb_sys::ArbSys;
pub use chain::{Chain, Deployment, Receipt};
pub use config::{ChainConfig, ConfigError};
pub use erc20_bridged::{ERC20Bridged, TokenMetadata};
pub use error::{GatewayPrecompileError, decode_error};
pub use l2_erc20_gateway::{GatewayConfig, L2ERC20TokenGateway};

pub use arb_gateway_contracts::precompiles::{ARB_SYS_ADDRESS, L1_TO_L2_ALIAS_OFFSET};
