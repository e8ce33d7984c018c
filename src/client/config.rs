//! Client configuration - passed from higher layers or read from the environment

use std::time::Duration;

use crate::chain::Network;
use crate::core::constants::{contract, CACHE_TTL, DEFAULT_CREATION_FEE, SETTLE_DELAY};
use crate::core::error::{TaisenError, TaisenResult};
use crate::tx::ContractIds;

#[derive(Debug, Clone)]
pub struct TaisenConfig {
    pub app: String,
    pub network: Network,
    pub contract: ContractIds,
    /// Overrides the network's public fullnode
    pub rpc_url: Option<String>,
    pub cache_ttl: Duration,
    pub settle_delay: Duration,
    pub creation_fee: u64,
}

impl Default for TaisenConfig {
    fn default() -> Self {
        Self {
            app: "taisen".into(),
            network: Network::default(),
            contract: ContractIds::default(),
            rpc_url: None,
            cache_ttl: CACHE_TTL,
            settle_delay: SETTLE_DELAY,
            creation_fee: DEFAULT_CREATION_FEE,
        }
    }
}

impl TaisenConfig {
    pub fn new(app: impl Into<String>) -> Self { Self { app: app.into(), ..Default::default() } }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_package(mut self, id: impl Into<String>) -> Self { self.contract.package_id = id.into(); self }
    pub fn with_platform_config(mut self, id: impl Into<String>) -> Self { self.contract.platform_config_id = id.into(); self }
    pub fn with_game_registry(mut self, id: impl Into<String>) -> Self { self.contract.game_registry_id = id.into(); self }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = Some(url.into()); self }
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self { self.cache_ttl = ttl; self }
    pub fn with_settle_delay(mut self, delay: Duration) -> Self { self.settle_delay = delay; self }
    pub fn with_creation_fee(mut self, mist: u64) -> Self { self.creation_fee = mist; self }

    pub fn rpc_url(&self) -> &str { self.rpc_url.as_deref().unwrap_or(self.network.fullnode_url()) }

    /// Read `TAISEN_*` variables over the defaults.
    pub fn from_env() -> TaisenResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("TAISEN_NETWORK") {
            config.network = value.parse()?;
        }
        if let Ok(value) = std::env::var("TAISEN_PACKAGE_ID") { config.contract.package_id = value; }
        if let Ok(value) = std::env::var("TAISEN_PLATFORM_CONFIG_ID") { config.contract.platform_config_id = value; }
        if let Ok(value) = std::env::var("TAISEN_GAME_REGISTRY_ID") { config.contract.game_registry_id = value; }
        if let Ok(value) = std::env::var("TAISEN_RPC_URL") { config.rpc_url = Some(value); }
        if let Ok(value) = std::env::var("TAISEN_CACHE_TTL_SECS") {
            let secs: u64 = value
                .parse()
                .map_err(|_| TaisenError::InvalidInput(format!("bad TAISEN_CACHE_TTL_SECS: {}", value)))?;
            config.cache_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Package id must be set before any chain query.
    pub fn require_package(&self) -> TaisenResult<&str> {
        if self.contract.package_id.is_empty() {
            return Err(TaisenError::InvalidInput("package id not configured (TAISEN_PACKAGE_ID)".into()));
        }
        Ok(&self.contract.package_id)
    }

    pub fn tournament_created_event(&self) -> TaisenResult<String> {
        Ok(format!("{}::{}::{}", self.require_package()?, contract::TOURNAMENT_MODULE, contract::TOURNAMENT_CREATED_EVENT))
    }

    pub fn admin_cap_type(&self) -> TaisenResult<String> {
        Ok(format!("{}::{}::{}", self.require_package()?, contract::PLATFORM_CONFIG_MODULE, contract::ADMIN_CAP_STRUCT))
    }
}
