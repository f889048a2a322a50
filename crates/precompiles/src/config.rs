//! TOML description of a gateway deployment and the transfers to replay on it.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::{Address, U256};
use serde::Deserialize;

use crate::{
    erc20_bridged::TokenMetadata, error::GatewayPrecompileError, l2_erc20_gateway::GatewayConfig,
};

/// Arbitrum One.
const DEFAULT_CHAIN_ID: u64 = 42161;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid chain config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("token is deployed at {token} but the gateway bridges {l2_token}")]
    TokenAddressMismatch { token: Address, l2_token: Address },

    #[error("chain setup failed: {0}")]
    Setup(#[from] GatewayPrecompileError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Receives `DEFAULT_ADMIN_ROLE` on the gateway and runs the setup transactions.
    pub admin: Address,
    pub gateway: GatewayDeployment,
    pub token: TokenDeployment,
    #[serde(default)]
    pub bridging: BridgingGates,
    /// Deposits relayed from the counterpart gateway by `simulate`.
    #[serde(default)]
    pub deposits: Vec<ScriptedTransfer>,
    /// Withdrawals sent directly to the gateway by `simulate`.
    #[serde(default)]
    pub withdrawals: Vec<ScriptedTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayDeployment {
    pub address: Address,
    #[serde(flatten)]
    pub config: GatewayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenDeployment {
    pub address: Address,
    #[serde(flatten)]
    pub metadata: TokenMetadata,
    #[serde(default)]
    pub balances: Vec<GenesisBalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GenesisBalance {
    pub account: Address,
    pub amount: U256,
}

/// Gates the admin opens right after initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BridgingGates {
    #[serde(default)]
    pub deposits_enabled: bool,
    #[serde(default)]
    pub withdrawals_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptedTransfer {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

impl ChainConfig {
    /// Checks that the deployments described by the config fit together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.address != self.gateway.config.l2_token {
            return Err(ConfigError::TokenAddressMismatch {
                token: self.token.address,
                l2_token: self.gateway.config.l2_token,
            });
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }
}

impl FromStr for ChainConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
