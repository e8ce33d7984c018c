//! Tournament data access
//!
//! # Reads
//!
//! ```text
//! fetch_all_tournaments
//!   ├── cache fresh? ──────────────► cached listing
//!   └── suix_queryEvents(TournamentCreated), 50 per page
//!         └── sui_getObject(tournament_id) per event
//!               └── sort_for_listing ──► cache ──► listing
//! ```
//!
//! Matches live in a dynamic-field table on the tournament object and are
//! only loaded on demand (`fetch_matches`, `fetch_bracket`).
//!
//! # Writes
//!
//! Every write builds a programmable transaction, hands it to the active
//! wallet through `WalletSession::sign_and_execute` and refreshes the
//! listing on success.

mod cache;
mod service;

pub use cache::TtlCache;
pub use service::TournamentService;
