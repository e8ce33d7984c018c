//! In-memory chain and wallet fakes shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

use taisen::chain::{DynamicFieldInfo, EventCursor, Page, SuiEvent, SuiRpc};
use taisen::core::constants::features;
use taisen::tx::Transaction;
use taisen::wallet::{ExecutionResult, WalletAccount, WalletEvent, WalletKind, WalletProvider};
use taisen::{TaisenError, TaisenResult};

pub const PACKAGE: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";

pub fn addr(n: u8) -> String { format!("0x{:064x}", n) }

/// Tournament object as `sui_getObject` returns it.
pub fn tournament_object(id: &str, name: &str, status: u8, date_ms: u64, game_master: &str, participants: &[&str]) -> Value {
    json!({
        "data": {
            "objectId": id,
            "type": format!("{}::tournament::Tournament", PACKAGE),
            "content": {
                "dataType": "moveObject",
                "fields": {
                    "name": name,
                    "is_remote": true,
                    "date": date_ms.to_string(),
                    "game_type": "pokemon-tcg",
                    "description": "",
                    "entry_fee": "1000000000",
                    "gm_fee_bps": 500,
                    "sponsor_pool": "2000000000",
                    "player_pool": "0",
                    "participants": participants
                        .iter()
                        .map(|p| json!({ "fields": { "address": p, "username": "player" } }))
                        .collect::<Vec<_>>(),
                    "status": status,
                    "winner": null,
                    "game_master": game_master,
                    "current_round": 1,
                    "total_rounds": 2,
                    "matches": { "fields": { "id": { "id": format!("{}-matches", id) } } }
                }
            }
        }
    })
}

pub fn match_object(match_id: u64, round: u32, a: Option<&str>, b: Option<&str>) -> Value {
    json!({
        "data": {
            "content": {
                "fields": {
                    "name": match_id.to_string(),
                    "value": { "fields": {
                        "match_id": match_id.to_string(),
                        "round": round,
                        "player_a": a,
                        "player_b": b,
                        "winner": null,
                        "status": 0,
                        "next_match_id": null,
                        "next_match_slot": 0
                    } }
                }
            }
        }
    })
}

#[derive(Default)]
pub struct FakeRpc {
    pub objects: Mutex<HashMap<String, Value>>,
    pub created: Mutex<Vec<String>>,
    pub fields: Mutex<HashMap<String, Vec<String>>>,
    pub owned: Mutex<HashMap<String, Vec<Value>>>,
    pub page_size: usize,
    pub fail_events: Mutex<bool>,
    pub event_calls: AtomicUsize,
    pub object_calls: AtomicUsize,
}

impl FakeRpc {
    pub fn new(page_size: usize) -> Self { Self { page_size, ..Default::default() } }

    pub fn add_object(&self, id: &str, obj: Value) { self.objects.lock().unwrap().insert(id.to_string(), obj); }

    /// Object plus a `TournamentCreated` event pointing at it.
    pub fn add_tournament(&self, id: &str, obj: Value) {
        self.add_object(id, obj);
        self.created.lock().unwrap().push(id.to_string());
    }

    pub fn add_match(&self, tournament: &str, field_id: &str, obj: Value) {
        self.add_object(field_id, obj);
        self.fields
            .lock()
            .unwrap()
            .entry(format!("{}-matches", tournament))
            .or_default()
            .push(field_id.to_string());
    }

    pub fn event_calls(&self) -> usize { self.event_calls.load(Ordering::SeqCst) }
}

fn page_of<T: Clone>(items: &[T], start: usize, size: usize) -> (Vec<T>, Option<usize>) {
    let end = (start + size).min(items.len());
    let next = if end < items.len() { Some(end) } else { None };
    (items[start.min(end)..end].to_vec(), next)
}

#[async_trait]
impl SuiRpc for FakeRpc {
    async fn get_object(&self, id: &str) -> TaisenResult<Option<Value>> {
        self.object_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.objects.lock().unwrap().get(id).cloned())
    }

    async fn query_events(&self, event_type: &str, cursor: Option<EventCursor>, limit: usize) -> TaisenResult<Page<SuiEvent, EventCursor>> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        // a real node answers later; lets concurrent callers interleave
        tokio::task::yield_now().await;
        if *self.fail_events.lock().unwrap() {
            return Err(TaisenError::Transport("connection refused".into()));
        }
        assert_eq!(limit, 50);
        let start = cursor.map(|c| c.event_seq.parse::<usize>().unwrap()).unwrap_or(0);
        let created = self.created.lock().unwrap().clone();
        let (ids, next) = page_of(&created, start, self.page_size);
        let data = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| SuiEvent {
                id: EventCursor { tx_digest: format!("tx{}", start + i), event_seq: "0".into() },
                type_: event_type.to_string(),
                parsed_json: json!({ "tournament_id": id }),
            })
            .collect();
        Ok(Page {
            data,
            next_cursor: next.map(|n| EventCursor { tx_digest: format!("tx{}", n), event_seq: n.to_string() }),
            has_next_page: next.is_some(),
        })
    }

    async fn get_dynamic_fields(&self, parent: &str, cursor: Option<String>, _limit: usize) -> TaisenResult<Page<DynamicFieldInfo>> {
        let all = self.fields.lock().unwrap().get(parent).cloned().unwrap_or_default();
        let start = cursor.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);
        let (ids, next) = page_of(&all, start, self.page_size);
        Ok(Page {
            data: ids
                .into_iter()
                .map(|object_id| DynamicFieldInfo { name: json!(0), object_id, object_type: String::new() })
                .collect(),
            next_cursor: next.map(|n| n.to_string()),
            has_next_page: next.is_some(),
        })
    }

    async fn get_owned_objects(&self, owner: &str, _struct_type: &str, _cursor: Option<String>) -> TaisenResult<Page<Value>> {
        Ok(Page::last(self.owned.lock().unwrap().get(owner).cloned().unwrap_or_default()))
    }
}

pub const SUI_CHAINS: &[&str] = &["sui:devnet", "sui:testnet"];

pub struct FakeWallet {
    pub name: String,
    pub chains: Vec<String>,
    pub features: Vec<String>,
    pub kind: WalletKind,
    pub accounts: Mutex<Vec<WalletAccount>>,
    /// Accounts handed out on connect (the user approving in the wallet UI).
    pub grant: Vec<WalletAccount>,
    pub fail_connect: bool,
    pub connect_error: String,
    pub fail_disconnect: bool,
    pub fail_execute: bool,
    pub events: broadcast::Sender<WalletEvent>,
    pub disconnects: AtomicUsize,
    pub executed: Mutex<Vec<(Value, String, String)>>,
}

impl FakeWallet {
    pub fn new(name: &str, grant: &[&str]) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            name: name.to_string(),
            chains: SUI_CHAINS.iter().map(|c| c.to_string()).collect(),
            features: vec![
                features::CONNECT.to_string(),
                features::DISCONNECT.to_string(),
                features::EVENTS.to_string(),
                features::SIGN_AND_EXECUTE.to_string(),
            ],
            kind: WalletKind::Standard,
            accounts: Mutex::new(Vec::new()),
            grant: grant.iter().map(|a| WalletAccount::new(*a, SUI_CHAINS)).collect(),
            fail_connect: false,
            connect_error: "User rejected the request".into(),
            fail_disconnect: false,
            fail_execute: false,
            events,
            disconnects: AtomicUsize::new(0),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Already authorized: accounts visible before any connect call.
    pub fn authorized(name: &str, accounts: &[&str]) -> Self {
        let wallet = Self::new(name, accounts);
        *wallet.accounts.lock().unwrap() = wallet.grant.clone();
        wallet
    }

    /// zkLogin wallet for an OAuth provider, nothing authorized yet.
    pub fn social(name: &str, provider: &str, grant: &[&str]) -> Self {
        let mut wallet = Self::new(name, grant);
        wallet.kind = WalletKind::social(provider);
        wallet
    }

    pub fn without(mut self, feature: &str) -> Self {
        self.features.retain(|f| f != feature);
        self
    }

    pub fn on_chains(mut self, chains: &[&str]) -> Self {
        self.chains = chains.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn emit(&self, accounts: &[&str]) {
        let accounts: Vec<WalletAccount> = accounts.iter().map(|a| WalletAccount::new(*a, SUI_CHAINS)).collect();
        *self.accounts.lock().unwrap() = accounts.clone();
        let _ = self.events.send(WalletEvent::AccountsChanged(accounts));
    }

    pub fn disconnects(&self) -> usize { self.disconnects.load(Ordering::SeqCst) }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    fn name(&self) -> &str { &self.name }
    fn chains(&self) -> Vec<String> { self.chains.clone() }
    fn accounts(&self) -> Vec<WalletAccount> { self.accounts.lock().unwrap().clone() }
    fn features(&self) -> Vec<String> { self.features.clone() }
    fn kind(&self) -> WalletKind { self.kind.clone() }

    async fn connect(&self, _chains: &[&str]) -> TaisenResult<Vec<WalletAccount>> {
        if self.fail_connect {
            return Err(TaisenError::Wallet(self.connect_error.clone()));
        }
        *self.accounts.lock().unwrap() = self.grant.clone();
        Ok(self.grant.clone())
    }

    async fn disconnect(&self) -> TaisenResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect {
            return Err(TaisenError::Wallet("wallet locked".into()));
        }
        self.accounts.lock().unwrap().clear();
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        if self.supports(features::EVENTS) { Some(self.events.subscribe()) } else { None }
    }

    async fn sign_and_execute(&self, tx: &Transaction, account: &WalletAccount, chain: &str) -> TaisenResult<ExecutionResult> {
        if self.fail_execute {
            return Err(TaisenError::Wallet("insufficient gas".into()));
        }
        let mut executed = self.executed.lock().unwrap();
        executed.push((tx.to_json()?, account.address.clone(), chain.to_string()));
        Ok(ExecutionResult { digest: format!("digest{}", executed.len()), effects: Value::Null })
    }
}
