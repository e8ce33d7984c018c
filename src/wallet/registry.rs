//! WalletRegistry: providers announce themselves here, possibly long after
//! the session started.

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::wallet::provider::WalletProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered(String),
    Unregistered(String),
}

pub struct WalletRegistry {
    wallets: RwLock<Vec<Arc<dyn WalletProvider>>>,
    events: broadcast::Sender<RegistryEvent>,
}

impl Default for WalletRegistry {
    fn default() -> Self { Self::new() }
}

impl WalletRegistry {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self { wallets: RwLock::new(Vec::new()), events }
    }

    pub fn register(&self, wallet: Arc<dyn WalletProvider>) {
        let name = wallet.name().to_string();
        self.wallets.write().unwrap_or_else(PoisonError::into_inner).push(wallet);
        tracing::debug!(wallet = %name, "wallet registered");
        let _ = self.events.send(RegistryEvent::Registered(name));
    }

    /// Removes every provider registered under `name`.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = {
            let mut wallets = self.wallets.write().unwrap_or_else(PoisonError::into_inner);
            let before = wallets.len();
            wallets.retain(|w| w.name() != name);
            before != wallets.len()
        };
        if removed {
            tracing::debug!(wallet = %name, "wallet unregistered");
            let _ = self.events.send(RegistryEvent::Unregistered(name.to_string()));
        }
        removed
    }

    /// Snapshot in registration order.
    pub fn get(&self) -> Vec<Arc<dyn WalletProvider>> {
        self.wallets.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn WalletProvider>> {
        self.wallets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|w| w.name() == name)
            .cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> { self.events.subscribe() }
}
