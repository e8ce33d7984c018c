//! Runtime - stop signal for the background wallet reconciler
//!
//! `WalletSession::spawn_reconciler` races its settle delay and every
//! registry event against a `Shutdown` receiver. Triggering wakes all
//! reconcilers at once; `stop` also waits for one to wind down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Stop signal shared by a client and its reconcilers. Clones share it.
#[derive(Clone)]
pub struct Shutdown {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Default for Shutdown {
    fn default() -> Self { Self::new() }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender, triggered: Arc::new(AtomicBool::new(false)) }
    }

    /// Receiver for a reconciler. One subscribed after the trigger never
    /// fires, check `is_triggered` before spawning.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Wake every reconciler. Only the first call sends.
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            tracing::debug!(reconcilers = self.sender.receiver_count(), "shutdown triggered");
            let _ = self.sender.send(());
        }
    }

    pub fn is_triggered(&self) -> bool { self.triggered.load(Ordering::SeqCst) }

    /// Trigger, then wait for `reconciler` to return. A panicked task is
    /// logged, not propagated.
    pub async fn stop(&self, reconciler: JoinHandle<()>) {
        self.trigger();
        if let Err(e) = reconciler.await {
            tracing::warn!(error = %e, "reconciler ended abnormally");
        }
    }
}
