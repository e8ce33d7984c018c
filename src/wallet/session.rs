//! WalletSession: one active wallet and account, reconciled against what
//! the registry holds and what the user last asked for.
//!
//! Providers register asynchronously, so the session cannot decide at
//! startup. It reconciles after a settle delay and again on every registry
//! event. An explicit disconnect always wins over auto-reconnect.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::chain::Network;
use crate::core::constants::{chains, features, social, SETTLE_DELAY};
use crate::core::error::{TaisenError, TaisenResult};
use crate::core::ids;
use crate::tx::Transaction;
use crate::wallet::intent::IntentStore;
use crate::wallet::provider::{
    has_events, is_social_wallet, is_sui_wallet, sui_accounts, ExecutionResult, WalletAccount, WalletEvent, WalletProvider,
};
use crate::wallet::registry::WalletRegistry;

/// Read-only copy of the session for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub wallet: Option<String>,
    pub account: Option<WalletAccount>,
    pub is_connecting: bool,
    pub error: Option<String>,
    pub auth_ready: bool,
}

#[derive(Default)]
struct SessionState {
    wallet: Option<Arc<dyn WalletProvider>>,
    account: Option<WalletAccount>,
    is_connecting: bool,
    error: Option<String>,
    auth_ready: bool,
}

impl SessionState {
    fn reset(&mut self) {
        if let Some(w) = &self.wallet {
            tracing::debug!(wallet = %w.name(), "session reset");
        }
        self.wallet = None;
        self.account = None;
    }

    fn wallet_name(&self) -> Option<&str> { self.wallet.as_ref().map(|w| w.name()) }
}

struct SessionInner {
    registry: Arc<WalletRegistry>,
    intent: Arc<dyn IntentStore>,
    state: Mutex<SessionState>,
    listeners: Mutex<HashMap<String, JoinHandle<()>>>,
    settle_delay: Duration,
}

impl SessionInner {
    fn state(&self) -> MutexGuard<'_, SessionState> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }

    fn listeners(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Account change from a wallet's event stream. Events from wallets
    /// other than the active one are ignored.
    fn on_accounts_changed(&self, wallet: &str, accounts: Vec<WalletAccount>) {
        let mut state = self.state();
        if state.wallet_name() != Some(wallet) {
            return;
        }
        match accounts.into_iter().next() {
            Some(first) => {
                tracing::debug!(wallet, address = %first.address, "active account changed");
                state.account = Some(first);
            }
            None => {
                tracing::info!(wallet, "wallet revoked all accounts");
                state.reset();
            }
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        for (_, task) in self.listeners.get_mut().unwrap_or_else(PoisonError::into_inner).drain() {
            task.abort();
        }
    }
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<SessionInner>,
}

impl WalletSession {
    pub fn new(registry: Arc<WalletRegistry>, intent: Arc<dyn IntentStore>) -> Self {
        Self::with_settle_delay(registry, intent, SETTLE_DELAY)
    }

    pub fn with_settle_delay(registry: Arc<WalletRegistry>, intent: Arc<dyn IntentStore>, settle_delay: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                registry,
                intent,
                state: Mutex::new(SessionState::default()),
                listeners: Mutex::new(HashMap::new()),
                settle_delay,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<WalletRegistry> { &self.inner.registry }

    // Accessors

    pub fn is_connected(&self) -> bool { self.inner.state().account.is_some() }
    pub fn address(&self) -> Option<String> { self.inner.state().account.as_ref().map(|a| a.address.clone()) }
    pub fn truncated_address(&self) -> Option<String> { self.address().map(|a| ids::truncate(&a)) }
    pub fn active_wallet(&self) -> Option<Arc<dyn WalletProvider>> { self.inner.state().wallet.clone() }
    pub fn account(&self) -> Option<WalletAccount> { self.inner.state().account.clone() }
    pub fn is_connecting(&self) -> bool { self.inner.state().is_connecting }
    pub fn error(&self) -> Option<String> { self.inner.state().error.clone() }
    pub fn auth_ready(&self) -> bool { self.inner.state().auth_ready }

    /// All accounts the active wallet exposes.
    pub fn accounts(&self) -> Vec<WalletAccount> {
        self.active_wallet().map(|w| w.accounts()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state();
        SessionSnapshot {
            wallet: state.wallet_name().map(String::from),
            account: state.account.clone(),
            is_connecting: state.is_connecting,
            error: state.error.clone(),
            auth_ready: state.auth_ready,
        }
    }

    /// Registered Sui wallets, first registration wins on duplicate names.
    pub fn available_wallets(&self) -> Vec<Arc<dyn WalletProvider>> {
        let mut seen = HashSet::new();
        self.inner
            .registry
            .get()
            .into_iter()
            .filter(|w| is_sui_wallet(w.as_ref()) && seen.insert(w.name().to_string()))
            .collect()
    }

    /// Registered social-login wallets, in registration order.
    pub fn social_wallets(&self) -> Vec<Arc<dyn WalletProvider>> {
        self.available_wallets()
            .into_iter()
            .filter(|w| is_social_wallet(w.as_ref()))
            .collect()
    }

    fn fail(&self, err: TaisenError) -> TaisenResult<()> {
        self.inner.state().error = Some(err.to_string());
        Err(err)
    }

    /// Connect to the named wallet. Failures are kept in `error()` and
    /// returned.
    pub async fn connect(&self, wallet_name: &str) -> TaisenResult<()> {
        tracing::info!(wallet = %wallet_name, "connect requested");
        let Some(wallet) = self.inner.registry.find(wallet_name) else {
            return self.fail(TaisenError::WalletNotFound(wallet_name.to_string()));
        };
        if !wallet.supports(features::CONNECT) {
            return self.fail(TaisenError::UnsupportedFeature("connection".into()));
        }

        {
            let mut state = self.inner.state();
            state.is_connecting = true;
            state.error = None;
        }
        if let Err(e) = self.inner.intent.set_disconnected(false) {
            tracing::warn!(error = %e, "could not clear disconnected flag");
        }

        let result = wallet.connect(chains::CONNECT_CHAINS).await;

        let outcome = match result {
            Ok(accounts) => {
                let sui = sui_accounts(&accounts, is_sui_wallet(wallet.as_ref()));
                match sui.into_iter().next() {
                    Some(first) => {
                        tracing::info!(wallet = %wallet_name, address = %first.address, "wallet connected");
                        let previous = {
                            let mut state = self.inner.state();
                            let previous = state.wallet_name().map(String::from);
                            state.wallet = Some(wallet.clone());
                            state.account = Some(first);
                            previous
                        };
                        if let Some(previous) = previous.filter(|p| p != wallet_name) {
                            self.remove_listener(&previous);
                        }
                        if let Err(e) = self.inner.intent.set_last_wallet(Some(wallet_name)) {
                            tracing::warn!(error = %e, "could not persist last wallet");
                        }
                        self.install_listener(&wallet);
                    }
                    None => tracing::warn!(wallet = %wallet_name, "connect returned no Sui accounts"),
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(wallet = %wallet_name, error = %e, "connection failed");
                self.inner.state().error = Some(e.to_string());
                Err(e)
            }
        };

        self.inner.state().is_connecting = false;
        outcome
    }

    /// Sign in through the social-login wallet for `provider` (`google`).
    /// The wallet runs the OAuth flow; a closed login window is reported
    /// as `LoginWindowClosed`.
    pub async fn connect_social(&self, provider: &str) -> TaisenResult<()> {
        let socials = self.social_wallets();
        let Some(wallet) = socials.iter().find(|w| w.kind().provider() == Some(provider)) else {
            let offered: Vec<String> = socials
                .iter()
                .filter_map(|w| w.kind().provider().map(String::from))
                .collect();
            tracing::error!(provider, ?offered, "no social wallet for provider");
            return self.fail(TaisenError::SocialLoginUnavailable(capitalize(provider)));
        };

        match self.connect(wallet.name()).await {
            Err(e) if e.to_string().contains(social::POPUP_CLOSED) => {
                tracing::warn!(provider, "login window closed");
                self.fail(TaisenError::LoginWindowClosed)
            }
            other => other,
        }
    }

    /// Forget the session and remember that the user chose to leave.
    /// Wallet-side disconnect failures are logged only.
    pub async fn disconnect(&self) {
        tracing::info!("disconnecting");
        if let Err(e) = self.inner.intent.set_disconnected(true) {
            tracing::warn!(error = %e, "could not persist disconnected flag");
        }

        let wallet = {
            let mut state = self.inner.state();
            let wallet = state.wallet.take();
            state.reset();
            wallet
        };

        let Some(wallet) = wallet else { return };
        if wallet.supports(features::DISCONNECT) {
            if let Err(e) = wallet.disconnect().await {
                tracing::error!(wallet = %wallet.name(), error = %e, "wallet disconnect failed");
            }
        } else {
            tracing::debug!(wallet = %wallet.name(), "standard:disconnect not supported");
        }
        self.remove_listener(wallet.name());
    }

    pub fn select_account(&self, account: WalletAccount) -> TaisenResult<()> {
        let mut state = self.inner.state();
        if state.wallet.is_none() {
            return Err(TaisenError::NotConnected);
        }
        state.account = Some(account);
        Ok(())
    }

    /// Re-derive the session from the registry and the persisted intent.
    ///
    /// The last used wallet is preferred when it is registered and exposes
    /// Sui accounts; otherwise the first registered Sui wallet that does.
    pub fn reconcile(&self) {
        let disconnected = self.inner.intent.is_disconnected().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read disconnected flag");
            false
        });
        if disconnected {
            tracing::debug!("user explicitly disconnected, skipping auto-connect");
            let mut state = self.inner.state();
            state.reset();
            state.auth_ready = true;
            return;
        }

        let preferred = self.inner.intent.last_wallet().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read last wallet");
            None
        });

        let mut candidates: Vec<Arc<dyn WalletProvider>> = self
            .inner
            .registry
            .get()
            .into_iter()
            .filter(|w| is_sui_wallet(w.as_ref()))
            .collect();
        if let Some(name) = preferred.as_deref() {
            // stable: keeps registration order among the rest
            candidates.sort_by_key(|w| w.name() != name);
        }

        for wallet in candidates {
            let accounts = sui_accounts(&wallet.accounts(), true);
            let Some(first) = accounts.first().cloned() else { continue };

            let (changed, previous) = {
                let mut state = self.inner.state();
                let previous = state.wallet_name().map(String::from);
                let same_wallet = state.wallet_name() == Some(wallet.name());
                let keep_current = same_wallet
                    && state
                        .account
                        .as_ref()
                        .is_some_and(|cur| accounts.iter().any(|a| a.address == cur.address));
                if !keep_current {
                    state.account = Some(first);
                }
                state.wallet = Some(wallet.clone());
                state.auth_ready = true;
                (!same_wallet, previous)
            };
            if changed {
                tracing::info!(wallet = %wallet.name(), "found connected wallet");
                if let Some(previous) = previous {
                    self.remove_listener(&previous);
                }
                self.install_listener(&wallet);
            }
            return;
        }

        let previous = {
            let mut state = self.inner.state();
            let previous = state.wallet_name().map(String::from);
            state.reset();
            state.auth_ready = true;
            previous
        };
        if let Some(previous) = previous {
            self.remove_listener(&previous);
        }
    }

    /// Reconcile after the settle delay, then on every registry event,
    /// until `shutdown` fires.
    pub fn spawn_reconciler(&self, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let session = self.clone();
        let mut events = self.inner.registry.subscribe();
        // armed now so the delay counts from the call, not from first poll
        let settle = tokio::time::sleep(self.inner.settle_delay);

        tokio::spawn(async move {
            tokio::pin!(settle);
            tokio::select! {
                _ = &mut settle => {}
                _ = shutdown.recv() => return,
            }
            session.reconcile();

            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(event) => {
                            tracing::debug!(?event, "registry changed");
                            session.reconcile();
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "registry events lagged");
                            session.reconcile();
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = shutdown.recv() => break,
                }
            }
        })
    }

    /// Sign and execute through the active wallet on `network`'s chain.
    pub async fn sign_and_execute(&self, tx: &Transaction, network: Network) -> TaisenResult<ExecutionResult> {
        let (wallet, account) = {
            let state = self.inner.state();
            (state.wallet.clone(), state.account.clone())
        };
        let wallet = wallet.ok_or(TaisenError::NotConnected)?;
        if !wallet.supports(features::SIGN_AND_EXECUTE) {
            return Err(TaisenError::UnsupportedFeature("transaction execution".into()));
        }
        let account = account.ok_or(TaisenError::NoAccount)?;
        let chain = network.chain();
        tracing::info!(wallet = %wallet.name(), %chain, "signing transaction");
        wallet.sign_and_execute(tx, &account, &chain).await
    }

    /// Follow the wallet's change events. Replaces any earlier listener for
    /// the same wallet; needs a running tokio runtime.
    fn install_listener(&self, wallet: &Arc<dyn WalletProvider>) {
        let name = wallet.name().to_string();
        self.remove_listener(&name);

        if !has_events(wallet.as_ref()) {
            tracing::debug!(wallet = %name, "standard:events not supported");
            return;
        }
        let Some(mut rx) = wallet.subscribe() else { return };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(wallet = %name, "no runtime, account changes will not be followed");
            return;
        };

        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let wallet_name = name.clone();
        let task = runtime.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(WalletEvent::AccountsChanged(accounts)) => {
                        let Some(inner) = weak.upgrade() else { break };
                        inner.on_accounts_changed(&wallet_name, accounts);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(wallet = %wallet_name, skipped, "wallet events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        self.inner.listeners().insert(name, task);
    }

    fn remove_listener(&self, name: &str) {
        if let Some(task) = self.inner.listeners().remove(name) {
            task.abort();
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
