use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::TaisenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network { #[default] Devnet, Testnet, Mainnet, Localnet }

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self { Network::Devnet => "devnet", Network::Testnet => "testnet", Network::Mainnet => "mainnet", Network::Localnet => "localnet" }
    }

    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Wallet-standard chain id, e.g. `sui:testnet`
    pub fn chain(&self) -> String { format!("sui:{}", self.as_str()) }
}

impl FromStr for Network {
    type Err = TaisenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "localnet" | "local" => Ok(Network::Localnet),
            _ => Err(TaisenError::InvalidInput(format!("unknown network: {}", value))),
        }
    }
}
