//! WalletProvider: the wallet-standard surface a session drives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::core::constants::{chains, features};
use crate::core::error::TaisenResult;
use crate::tx::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl WalletAccount {
    pub fn new(address: impl Into<String>, chains: &[&str]) -> Self {
        Self { address: address.into(), chains: chains.iter().map(|c| c.to_string()).collect(), label: None }
    }

    pub fn is_sui(&self) -> bool { self.chains.iter().any(|c| c.starts_with(chains::SUI_PREFIX)) }
}

/// `standard:events` change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<WalletAccount>),
}

/// How a wallet holds the user's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WalletKind {
    /// Extension or app wallet with its own keys.
    #[default]
    Standard,
    /// zkLogin wallet signing for an OAuth account (`google`, `twitch`, ...).
    Social { provider: String },
}

impl WalletKind {
    pub fn social(provider: impl Into<String>) -> Self { WalletKind::Social { provider: provider.into() } }

    pub fn provider(&self) -> Option<&str> {
        match self {
            WalletKind::Standard => None,
            WalletKind::Social { provider } => Some(provider),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub digest: String,
    #[serde(default)]
    pub effects: Value,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn name(&self) -> &str;
    fn chains(&self) -> Vec<String>;
    /// Accounts the wallet currently exposes to this app (authorized ones).
    fn accounts(&self) -> Vec<WalletAccount>;
    fn features(&self) -> Vec<String>;

    fn kind(&self) -> WalletKind { WalletKind::Standard }

    fn supports(&self, feature: &str) -> bool { self.features().iter().any(|f| f == feature) }

    async fn connect(&self, chains: &[&str]) -> TaisenResult<Vec<WalletAccount>>;
    async fn disconnect(&self) -> TaisenResult<()>;

    /// Change events; `None` without `standard:events`.
    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>>;

    async fn sign_and_execute(&self, tx: &Transaction, account: &WalletAccount, chain: &str) -> TaisenResult<ExecutionResult>;
}

pub fn is_sui_wallet(wallet: &dyn WalletProvider) -> bool {
    wallet.chains().iter().any(|c| c.starts_with(chains::SUI_PREFIX))
}

pub fn has_events(wallet: &dyn WalletProvider) -> bool { wallet.supports(features::EVENTS) }

pub fn is_social_wallet(wallet: &dyn WalletProvider) -> bool { wallet.kind().provider().is_some() }

/// Sui accounts out of `accounts`. Some wallets leave account chains empty;
/// with `trust_all_if_empty` those wallets' accounts are all accepted.
pub fn sui_accounts(accounts: &[WalletAccount], trust_all_if_empty: bool) -> Vec<WalletAccount> {
    let filtered: Vec<WalletAccount> = accounts.iter().filter(|a| a.is_sui()).cloned().collect();
    if filtered.is_empty() && trust_all_if_empty { accounts.to_vec() } else { filtered }
}
