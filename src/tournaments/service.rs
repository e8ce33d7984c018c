//! TournamentService - cached reads over `SuiRpc`, writes through a `WalletSession`

use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::chain::{find_owned_object, EventCursor, SuiRpc};
use crate::client::TaisenConfig;
use crate::core::constants::{contract, EVENT_PAGE_LIMIT};
use crate::core::error::{TaisenError, TaisenResult};
use crate::core::ids;
use crate::model::{sort_for_listing, Bracket, GameCatalog, Match, Tournament, TournamentDisplay};
use crate::tournaments::cache::TtlCache;
use crate::tx::{
    build_create_tournament_tx, build_register_tx, build_report_match_result_tx, build_start_tournament_tx,
    CreateTournamentParams, Transaction,
};
use crate::wallet::{ExecutionResult, WalletSession};

#[derive(Default)]
struct ServiceState {
    error: Option<String>,
    tournaments: Vec<Tournament>,
}

/// Decrements the in-flight counter when the operation ends, however it ends.
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) { self.0.fetch_sub(1, Ordering::SeqCst); }
}

pub struct TournamentService<R: SuiRpc> {
    rpc: R,
    config: TaisenConfig,
    games: GameCatalog,
    // async lock: concurrent listings wait for the walk in progress
    cache: tokio::sync::Mutex<TtlCache<Tournament>>,
    state: Mutex<ServiceState>,
    loading: AtomicUsize,
}

fn now_ms() -> u64 { chrono::Utc::now().timestamp_millis().max(0) as u64 }

impl<R: SuiRpc> TournamentService<R> {
    pub fn new(rpc: R, config: TaisenConfig) -> Self {
        Self::with_games(rpc, config, GameCatalog::builtin())
    }

    pub fn with_games(rpc: R, config: TaisenConfig, games: GameCatalog) -> Self {
        let cache = TtlCache::new(config.cache_ttl);
        Self {
            rpc,
            config,
            games,
            cache: tokio::sync::Mutex::new(cache),
            state: Mutex::new(ServiceState::default()),
            loading: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &TaisenConfig { &self.config }
    pub fn games(&self) -> &GameCatalog { &self.games }
    pub fn rpc(&self) -> &R { &self.rpc }

    fn state(&self) -> MutexGuard<'_, ServiceState> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }

    // State

    pub fn is_loading(&self) -> bool { self.loading.load(Ordering::SeqCst) > 0 }
    pub fn error(&self) -> Option<String> { self.state().error.clone() }
    /// Last listing produced by `fetch_all_tournaments`.
    pub fn tournaments(&self) -> Vec<Tournament> { self.state().tournaments.clone() }

    fn record<T>(&self, result: TaisenResult<T>) -> TaisenResult<T> {
        if let Err(e) = &result {
            self.state().error = Some(e.to_string());
        }
        result
    }

    fn clear_error(&self) { self.state().error = None; }

    // Reads

    async fn load_tournament(&self, id: &str) -> TaisenResult<Option<Tournament>> {
        let Some(obj) = self.rpc.get_object(id).await? else { return Ok(None) };
        // suffix only, the prefix is the defining package
        let suffix = format!("::{}::{}", contract::TOURNAMENT_MODULE, contract::TOURNAMENT_STRUCT);
        let type_ok = obj
            .pointer("/data/type")
            .or_else(|| obj.get("type"))
            .and_then(Value::as_str)
            .map_or(true, |t| t.ends_with(&suffix));
        let tournament = Tournament::from_object(&obj);
        if !type_ok || tournament.id.is_empty() {
            return Err(TaisenError::Parse(format!("object {} is not a tournament", id)));
        }
        Ok(Some(tournament))
    }

    /// A missing object yields `None` and sets `error()`.
    pub async fn fetch_tournament(&self, id: &str) -> TaisenResult<Option<Tournament>> {
        let _loading = Loading::start(&self.loading);
        self.clear_error();
        match self.record(self.load_tournament(id).await)? {
            Some(t) => Ok(Some(t)),
            None => {
                tracing::warn!(tournament = %id, "tournament not found");
                self.state().error = Some(TaisenError::NotFound(format!("tournament {}", id)).to_string());
                Ok(None)
            }
        }
    }

    /// Ids from every `TournamentCreated` event, oldest first, deduplicated.
    async fn created_tournament_ids(&self) -> TaisenResult<Vec<String>> {
        let event_type = self.config.tournament_created_event()?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut cursor: Option<EventCursor> = None;

        loop {
            let page = self.rpc.query_events(&event_type, cursor.clone(), EVENT_PAGE_LIMIT).await?;
            for event in &page.data {
                match event.parsed_json.get("tournament_id").and_then(Value::as_str) {
                    Some(id) if seen.insert(id.to_string()) => out.push(id.to_string()),
                    Some(_) => {}
                    None => tracing::warn!(tx = %event.id.tx_digest, "TournamentCreated without tournament_id"),
                }
            }
            match page.continuation() {
                Some(next) => cursor = Some(next.clone()),
                None => break,
            }
        }
        tracing::debug!(count = out.len(), "tournament ids from events");
        Ok(out)
    }

    async fn walk_tournaments(&self) -> TaisenResult<Vec<Tournament>> {
        let created = self.created_tournament_ids().await?;
        let mut tournaments = Vec::with_capacity(created.len());
        for id in created {
            match self.load_tournament(&id).await {
                Ok(Some(t)) => tournaments.push(t),
                Ok(None) => tracing::warn!(tournament = %id, "created tournament no longer exists"),
                Err(e) => tracing::warn!(tournament = %id, error = %e, "skipping tournament"),
            }
        }
        sort_for_listing(&mut tournaments, now_ms());
        Ok(tournaments)
    }

    /// Every tournament ever created, in listing order. Served from cache
    /// while fresh. A failed walk sets `error()` and yields an empty list.
    pub async fn fetch_all_tournaments(&self) -> Vec<Tournament> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.get_fresh() {
            tracing::debug!(count = cached.len(), "tournaments from cache");
            self.state().tournaments = cached.clone();
            return cached;
        }

        let _loading = Loading::start(&self.loading);
        self.clear_error();
        match self.walk_tournaments().await {
            Ok(tournaments) => {
                tracing::info!(count = tournaments.len(), "tournaments fetched");
                cache.store(tournaments.clone());
                self.state().tournaments = tournaments.clone();
                tournaments
            }
            Err(e) => {
                tracing::error!(error = %e, "tournament listing failed");
                let mut state = self.state();
                state.error = Some(e.to_string());
                state.tournaments.clear();
                Vec::new()
            }
        }
    }

    pub async fn fetch_game_master_tournaments(&self, address: &str) -> Vec<Tournament> {
        self.fetch_all_tournaments()
            .await
            .into_iter()
            .filter(|t| ids::same(&t.game_master, address))
            .collect()
    }

    pub async fn fetch_registered_tournaments(&self, address: &str) -> Vec<Tournament> {
        self.fetch_all_tournaments()
            .await
            .into_iter()
            .filter(|t| t.is_participant(address))
            .collect()
    }

    /// Attach the tournament's matches, sorted by round then match id.
    pub async fn fetch_matches(&self, tournament: &mut Tournament) -> TaisenResult<()> {
        let Some(table) = tournament.matches_table_id.clone() else {
            tournament.matches.clear();
            return Ok(());
        };
        let _loading = Loading::start(&self.loading);

        let mut fields = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.record(self.rpc.get_dynamic_fields(&table, cursor.clone(), EVENT_PAGE_LIMIT).await)?;
            fields.extend(page.data.iter().map(|f| f.object_id.clone()));
            match page.continuation() {
                Some(next) => cursor = Some(next.clone()),
                None => break,
            }
        }

        let mut matches = Vec::with_capacity(fields.len());
        for field_id in fields {
            match self.record(self.rpc.get_object(&field_id).await)? {
                Some(obj) => match Match::from_field_object(&obj) {
                    Some(m) => matches.push(m),
                    None => tracing::warn!(field = %field_id, "unreadable match entry"),
                },
                None => tracing::warn!(field = %field_id, "match entry vanished"),
            }
        }
        matches.sort_by_key(|m| (m.round, m.match_id));
        tracing::debug!(tournament = %tournament.id, count = matches.len(), "matches fetched");
        tournament.matches = matches;
        Ok(())
    }

    pub async fn fetch_bracket(&self, id: &str) -> TaisenResult<Option<Bracket>> {
        let Some(mut tournament) = self.fetch_tournament(id).await? else { return Ok(None) };
        self.fetch_matches(&mut tournament).await?;
        Ok(Some(Bracket::from_tournament(&tournament)))
    }

    /// Cards for the last listing.
    pub fn display_tournaments(&self) -> Vec<TournamentDisplay> {
        let now = now_ms();
        self.state()
            .tournaments
            .iter()
            .map(|t| TournamentDisplay::from_tournament(t, &self.games, now))
            .collect()
    }

    pub async fn refresh(&self) -> Vec<Tournament> {
        self.cache.lock().await.invalidate();
        self.fetch_all_tournaments().await
    }

    /// Platform admin capability held by `owner`, if any.
    pub async fn find_admin_cap(&self, owner: &str) -> TaisenResult<Option<String>> {
        let cap_type = self.config.admin_cap_type()?;
        self.record(find_owned_object(&self.rpc, owner, &cap_type).await)
    }

    // Writes

    async fn submit(&self, session: &WalletSession, action: &str, tx: TaisenResult<Transaction>) -> TaisenResult<ExecutionResult> {
        let _loading = Loading::start(&self.loading);
        self.clear_error();
        if session.active_wallet().is_none() {
            return self.record(Err(TaisenError::NotConnected));
        }
        let mut tx = self.record(tx)?;
        if let Some(sender) = session.address() {
            self.record(tx.set_sender(&sender))?;
        }

        let result = session.sign_and_execute(&tx, self.config.network).await;
        match &result {
            Ok(done) => tracing::info!(action, digest = %done.digest, "transaction executed"),
            Err(e) => tracing::error!(action, error = %e, "transaction failed"),
        }
        let done = self.record(result)?;
        self.refresh().await;
        Ok(done)
    }

    pub async fn register_for_tournament(&self, session: &WalletSession, tournament_id: &str, username: &str, entry_fee: u64) -> TaisenResult<ExecutionResult> {
        let tx = self
            .config
            .require_package()
            .and_then(|pkg| build_register_tx(pkg, tournament_id, username, entry_fee));
        self.submit(session, "register", tx).await
    }

    pub async fn create_tournament(&self, session: &WalletSession, params: &CreateTournamentParams) -> TaisenResult<ExecutionResult> {
        let tx = self
            .config
            .require_package()
            .and_then(|_| build_create_tournament_tx(params, &self.config.contract, self.config.creation_fee));
        self.submit(session, "create_tournament", tx).await
    }

    pub async fn start_tournament(&self, session: &WalletSession, tournament_id: &str) -> TaisenResult<ExecutionResult> {
        let tx = self
            .config
            .require_package()
            .and_then(|pkg| build_start_tournament_tx(pkg, tournament_id));
        self.submit(session, "start_tournament", tx).await
    }

    pub async fn report_match_result(&self, session: &WalletSession, tournament_id: &str, match_id: u64, winner: &str) -> TaisenResult<ExecutionResult> {
        let tx = self
            .config
            .require_package()
            .and_then(|pkg| build_report_match_result_tx(pkg, tournament_id, match_id, winner));
        self.submit(session, "report_match_result", tx).await
    }
}
