//! TaisenClient - wires chain access, the wallet session and the tournament
//! service behind one handle.

mod config;

pub use config::TaisenConfig;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::chain::SuiRpc;
use crate::runtime::Shutdown;
use crate::tournaments::TournamentService;
use crate::wallet::{IntentStore, WalletRegistry, WalletSession};

pub type SharedRpc = Arc<dyn SuiRpc>;

pub struct TaisenClient {
    config: TaisenConfig,
    registry: Arc<WalletRegistry>,
    session: WalletSession,
    service: TournamentService<SharedRpc>,
    shutdown: Shutdown,
    reconciler: Option<JoinHandle<()>>,
}

impl TaisenClient {
    /// JSON-RPC against the configured network, intent persisted under the
    /// app's data directory.
    #[cfg(feature = "native")]
    pub fn from_config(config: TaisenConfig) -> Self {
        use crate::chain::JsonRpcClient;
        use crate::wallet::FileIntentStore;

        let rpc: SharedRpc = Arc::new(JsonRpcClient::new(config.rpc_url()));
        let intent: Arc<dyn IntentStore> = Arc::new(FileIntentStore::open(&config.app));
        Self::with_parts(config, rpc, intent)
    }

    pub fn with_parts(config: TaisenConfig, rpc: SharedRpc, intent: Arc<dyn IntentStore>) -> Self {
        tracing::info!(network = %config.network.as_str(), package = %config.contract.package_id, "client created");
        let registry = Arc::new(WalletRegistry::new());
        let session = WalletSession::with_settle_delay(registry.clone(), intent, config.settle_delay);
        let service = TournamentService::new(rpc, config.clone());
        Self { config, registry, session, service, shutdown: Shutdown::new(), reconciler: None }
    }

    pub fn config(&self) -> &TaisenConfig { &self.config }
    pub fn registry(&self) -> &Arc<WalletRegistry> { &self.registry }
    pub fn session(&self) -> &WalletSession { &self.session }
    pub fn tournaments(&self) -> &TournamentService<SharedRpc> { &self.service }
    pub fn shutdown_handle(&self) -> Shutdown { self.shutdown.clone() }

    /// Start following wallet registrations. Idempotent; a closed client
    /// stays closed.
    pub fn start(&mut self) {
        if self.shutdown.is_triggered() {
            tracing::warn!("client closed, reconciler not started");
            return;
        }
        if self.reconciler.is_none() {
            self.reconciler = Some(self.session.spawn_reconciler(self.shutdown.subscribe()));
        }
    }

    pub async fn close(&mut self) {
        match self.reconciler.take() {
            Some(task) => self.shutdown.stop(task).await,
            None => self.shutdown.trigger(),
        }
    }
}
