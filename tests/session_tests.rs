//! WalletSession: reconcile rules, connect/disconnect, wallet events,
//! settle delay.

mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;

use taisen::core::constants::{features, social};
use taisen::runtime::Shutdown;
use taisen::tx::Transaction;
use taisen::wallet::{Intent, IntentStore, MemoryIntentStore, WalletAccount, WalletRegistry, WalletSession};
use taisen::{Network, TaisenError};

struct Harness {
    registry: Arc<WalletRegistry>,
    intent: Arc<MemoryIntentStore>,
    session: WalletSession,
}

fn harness(intent: Intent) -> Harness {
    let registry = Arc::new(WalletRegistry::new());
    let intent = Arc::new(MemoryIntentStore::with_intent(intent));
    let session = WalletSession::new(registry.clone(), intent.clone());
    Harness { registry, intent, session }
}

impl Harness {
    fn add(&self, wallet: FakeWallet) -> Arc<FakeWallet> {
        let wallet = Arc::new(wallet);
        self.registry.register(wallet.clone());
        wallet
    }
}

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    check()
}

fn last(name: &str) -> Intent { Intent { last_wallet: Some(name.into()), disconnected: None } }

#[tokio::test]
async fn reconcile_prefers_last_used_wallet() {
    let h = harness(last("Beta"));
    h.add(FakeWallet::authorized("Alpha", &[&addr(1)]));
    h.add(FakeWallet::authorized("Beta", &[&addr(2)]));

    assert!(!h.session.auth_ready());
    h.session.reconcile();
    assert_eq!(h.session.active_wallet().unwrap().name(), "Beta");
    assert_eq!(h.session.address(), Some(addr(2)));
    assert!(h.session.auth_ready());
}

#[tokio::test]
async fn reconcile_falls_back_to_first_wallet_with_accounts() {
    let h = harness(last("Gone"));
    h.add(FakeWallet::new("Locked", &[&addr(1)]));
    h.add(FakeWallet::authorized("Open", &[&addr(2)]));
    h.add(FakeWallet::authorized("Solana", &[&addr(3)]).on_chains(&["solana:mainnet"]));

    h.session.reconcile();
    assert_eq!(h.session.active_wallet().unwrap().name(), "Open");
    assert_eq!(h.session.truncated_address(), Some("0x0000...0002".to_string()));
}

#[tokio::test]
async fn reconcile_honors_explicit_disconnect() {
    let h = harness(Intent { last_wallet: Some("Alpha".into()), disconnected: Some("true".into()) });
    h.add(FakeWallet::authorized("Alpha", &[&addr(1)]));

    h.session.reconcile();
    assert!(!h.session.is_connected());
    assert!(h.session.active_wallet().is_none());
    assert!(h.session.auth_ready());
}

#[tokio::test]
async fn reconcile_without_wallets_is_ready_and_empty() {
    let h = harness(Intent::default());
    h.add(FakeWallet::authorized("Solana", &[&addr(3)]).on_chains(&["solana:mainnet"]));

    h.session.reconcile();
    assert!(!h.session.is_connected());
    assert!(h.session.auth_ready());
    assert!(h.session.available_wallets().is_empty());
}

#[tokio::test]
async fn reconcile_keeps_the_selected_account_while_present() {
    let h = harness(Intent::default());
    let wallet = h.add(FakeWallet::authorized("Alpha", &[&addr(1), &addr(2)]));

    h.session.reconcile();
    assert_eq!(h.session.address(), Some(addr(1)));
    assert_eq!(h.session.accounts().len(), 2);

    h.session.select_account(WalletAccount::new(addr(2), SUI_CHAINS)).unwrap();
    h.session.reconcile();
    assert_eq!(h.session.address(), Some(addr(2)));

    *wallet.accounts.lock().unwrap() = vec![WalletAccount::new(addr(1), SUI_CHAINS)];
    h.session.reconcile();
    assert_eq!(h.session.address(), Some(addr(1)));
}

#[tokio::test]
async fn select_account_requires_a_wallet() {
    let h = harness(Intent::default());
    let err = h.session.select_account(WalletAccount::new(addr(1), SUI_CHAINS)).unwrap_err();
    assert!(matches!(err, TaisenError::NotConnected));
}

#[tokio::test]
async fn connect_sets_session_and_intent() {
    let h = harness(Intent { last_wallet: None, disconnected: Some("true".into()) });
    h.add(FakeWallet::new("Alpha", &[&addr(1)]));

    h.session.connect("Alpha").await.unwrap();
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.wallet.as_deref(), Some("Alpha"));
    assert_eq!(snapshot.account.map(|a| a.address), Some(addr(1)));
    assert!(!snapshot.is_connecting);
    assert!(snapshot.error.is_none());

    assert_eq!(h.intent.last_wallet().unwrap().as_deref(), Some("Alpha"));
    assert!(!h.intent.is_disconnected().unwrap());
}

#[tokio::test]
async fn connect_failures_are_recorded() {
    let h = harness(Intent::default());
    h.add(FakeWallet::new("NoConnect", &[&addr(1)]).without(features::CONNECT));
    let mut rejecting = FakeWallet::new("Rejecting", &[&addr(1)]);
    rejecting.fail_connect = true;
    h.add(rejecting);

    assert!(matches!(h.session.connect("Missing").await, Err(TaisenError::WalletNotFound(_))));
    assert_eq!(h.session.error().as_deref(), Some("Wallet Missing not found"));

    assert!(h.session.connect("NoConnect").await.is_err());
    assert_eq!(h.session.error().as_deref(), Some("Wallet does not support connection"));

    assert!(h.session.connect("Rejecting").await.is_err());
    assert!(h.session.error().unwrap().contains("User rejected"));
    assert!(!h.session.is_connecting());
    assert!(!h.session.is_connected());
    assert_eq!(h.intent.last_wallet().unwrap(), None);
}

#[tokio::test]
async fn disconnect_calls_the_wallet_and_sticks() {
    let h = harness(Intent::default());
    let wallet = h.add(FakeWallet::new("Alpha", &[&addr(1)]));
    h.session.connect("Alpha").await.unwrap();

    h.session.disconnect().await;
    assert_eq!(wallet.disconnects(), 1);
    assert!(!h.session.is_connected());
    assert!(h.intent.is_disconnected().unwrap());

    // the wallet still holds an authorized account, but the user left
    *wallet.accounts.lock().unwrap() = vec![WalletAccount::new(addr(1), SUI_CHAINS)];
    h.session.reconcile();
    assert!(!h.session.is_connected());

    h.session.disconnect().await;
    assert_eq!(wallet.disconnects(), 1);
}

#[tokio::test]
async fn failed_wallet_disconnect_still_clears_the_session() {
    let h = harness(Intent::default());
    let mut locked = FakeWallet::new("Alpha", &[&addr(1)]);
    locked.fail_disconnect = true;
    let wallet = h.add(locked);
    h.session.connect("Alpha").await.unwrap();

    h.session.disconnect().await;
    assert_eq!(wallet.disconnects(), 1);
    assert!(!h.session.is_connected());
    assert!(h.session.active_wallet().is_none());
    assert!(h.session.error().is_none());
    assert!(h.intent.is_disconnected().unwrap());
}

#[tokio::test]
async fn disconnect_without_wallet_support_only_resets() {
    let h = harness(Intent::default());
    let wallet = h.add(FakeWallet::new("Alpha", &[&addr(1)]).without(features::DISCONNECT));
    h.session.connect("Alpha").await.unwrap();
    assert_eq!(wallet.events.receiver_count(), 1);

    h.session.disconnect().await;
    assert_eq!(wallet.disconnects(), 0);
    assert!(!h.session.is_connected());
    assert!(h.intent.is_disconnected().unwrap());
    assert!(eventually(|| wallet.events.receiver_count() == 0).await);
}

#[tokio::test]
async fn wallets_without_events_get_no_listener() {
    let h = harness(Intent::default());
    let wallet = h.add(FakeWallet::new("Quiet", &[&addr(1)]).without(features::EVENTS));
    h.session.connect("Quiet").await.unwrap();
    assert!(h.session.is_connected());
    assert_eq!(wallet.events.receiver_count(), 0);
}

#[tokio::test]
async fn switching_wallets_drops_the_old_listener() {
    let h = harness(Intent::default());
    let alpha = h.add(FakeWallet::authorized("Alpha", &[&addr(1)]));
    let beta = h.add(FakeWallet::authorized("Beta", &[&addr(2)]));

    h.session.reconcile();
    assert_eq!(h.session.active_wallet().unwrap().name(), "Alpha");
    assert_eq!(alpha.events.receiver_count(), 1);

    alpha.accounts.lock().unwrap().clear();
    h.session.reconcile();
    assert_eq!(h.session.active_wallet().unwrap().name(), "Beta");
    assert!(eventually(|| alpha.events.receiver_count() == 0).await);
    assert_eq!(beta.events.receiver_count(), 1);

    h.session.connect("Alpha").await.unwrap();
    assert!(eventually(|| beta.events.receiver_count() == 0).await);
    assert_eq!(alpha.events.receiver_count(), 1);

    beta.accounts.lock().unwrap().clear();
    alpha.accounts.lock().unwrap().clear();
    h.session.reconcile();
    assert!(!h.session.is_connected());
    assert!(eventually(|| alpha.events.receiver_count() == 0).await);
}

#[tokio::test]
async fn social_login_connects_the_provider_wallet() {
    let h = harness(Intent::default());
    h.add(FakeWallet::new("Extension", &[&addr(1)]));
    h.add(FakeWallet::social("Sign in with Twitch", "twitch", &[&addr(2)]));
    let google = h.add(FakeWallet::social("Sign in with Google", "google", &[&addr(3)]));

    let socials: Vec<String> = h.session.social_wallets().iter().map(|w| w.name().to_string()).collect();
    assert_eq!(socials, ["Sign in with Twitch", "Sign in with Google"]);

    h.session.connect_social(social::GOOGLE).await.unwrap();
    assert_eq!(h.session.active_wallet().unwrap().name(), "Sign in with Google");
    assert_eq!(h.session.address(), Some(addr(3)));
    assert_eq!(h.intent.last_wallet().unwrap().as_deref(), Some("Sign in with Google"));
    assert_eq!(google.events.receiver_count(), 1);
}

#[tokio::test]
async fn social_login_without_provider_wallet_is_recorded() {
    let h = harness(Intent::default());
    h.add(FakeWallet::new("Extension", &[&addr(1)]));
    h.add(FakeWallet::social("Sign in with Twitch", "twitch", &[&addr(2)]));

    let err = h.session.connect_social("google").await.unwrap_err();
    assert!(matches!(err, TaisenError::SocialLoginUnavailable(_)));
    assert_eq!(h.session.error().as_deref(), Some("Google wallet not available"));
    assert!(!h.session.is_connected());
    assert!(!h.session.is_connecting());
}

#[tokio::test]
async fn social_login_closed_window_has_its_own_error() {
    let h = harness(Intent::default());
    let mut google = FakeWallet::social("Sign in with Google", "google", &[&addr(3)]);
    google.fail_connect = true;
    google.connect_error = "Popup closed by user".into();
    h.add(google);

    let err = h.session.connect_social("google").await.unwrap_err();
    assert!(matches!(err, TaisenError::LoginWindowClosed));
    assert_eq!(h.session.error().as_deref(), Some("Login window was closed or blocked. Please try again."));
    assert!(!h.session.is_connecting());
}

#[tokio::test(start_paused = true)]
async fn reconciler_picks_up_an_authorized_social_wallet() {
    let h = harness(Intent::default());
    let shutdown = Shutdown::new();
    let task = h.session.spawn_reconciler(shutdown.subscribe());

    tokio::time::advance(Duration::from_millis(300)).await;
    assert!(eventually(|| h.session.auth_ready()).await);

    let google = FakeWallet::social("Sign in with Google", "google", &[&addr(4)]);
    *google.accounts.lock().unwrap() = google.grant.clone();
    h.add(google);
    assert!(eventually(|| h.session.address() == Some(addr(4))).await);

    h.registry.unregister("Sign in with Google");
    assert!(eventually(|| !h.session.is_connected()).await);

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test]
async fn wallet_events_follow_the_active_wallet_only() {
    let h = harness(Intent::default());
    let alpha = h.add(FakeWallet::new("Alpha", &[&addr(1)]));
    let beta = h.add(FakeWallet::new("Beta", &[&addr(5)]));
    h.session.connect("Alpha").await.unwrap();

    alpha.emit(&[&addr(2), &addr(3)]);
    assert!(eventually(|| h.session.address() == Some(addr(2))).await);

    beta.emit(&[&addr(9)]);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.session.address(), Some(addr(2)));

    alpha.emit(&[]);
    assert!(eventually(|| !h.session.is_connected()).await);
    assert!(h.session.active_wallet().is_none());
}

#[tokio::test]
async fn available_wallets_are_deduplicated() {
    let h = harness(Intent::default());
    h.add(FakeWallet::new("Alpha", &[]));
    h.add(FakeWallet::new("Alpha", &[]));
    h.add(FakeWallet::new("Beta", &[]));

    let names: Vec<String> = h.session.available_wallets().iter().map(|w| w.name().to_string()).collect();
    assert_eq!(names, ["Alpha", "Beta"]);
}

#[tokio::test]
async fn sign_and_execute_uses_network_chain() {
    let h = harness(Intent::default());
    let wallet = h.add(FakeWallet::new("Alpha", &[&addr(1)]));

    let tx = Transaction::new();
    assert!(matches!(h.session.sign_and_execute(&tx, Network::Testnet).await, Err(TaisenError::NotConnected)));

    h.session.connect("Alpha").await.unwrap();
    let done = h.session.sign_and_execute(&tx, Network::Testnet).await.unwrap();
    assert_eq!(done.digest, "digest1");
    assert_eq!(wallet.executed.lock().unwrap()[0].2, "sui:testnet");
}

#[tokio::test(start_paused = true)]
async fn reconciler_waits_for_settle_delay_then_follows_registry() {
    let h = harness(Intent::default());
    let shutdown = Shutdown::new();
    let task = h.session.spawn_reconciler(shutdown.subscribe());

    tokio::time::advance(Duration::from_millis(299)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!h.session.auth_ready());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(eventually(|| h.session.auth_ready()).await);
    assert!(!h.session.is_connected());

    h.add(FakeWallet::authorized("Late", &[&addr(7)]));
    assert!(eventually(|| h.session.address() == Some(addr(7))).await);

    h.registry.unregister("Late");
    assert!(eventually(|| !h.session.is_connected()).await);

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reconciler_stops_during_settle_delay() {
    let h = harness(Intent::default());
    let shutdown = Shutdown::new();
    let task = h.session.spawn_reconciler(shutdown.subscribe());

    shutdown.trigger();
    task.await.unwrap();
    assert!(!h.session.auth_ready());
}
