//! Taisen: client for on-chain trading-card tournaments on Sui.
//!
//! # Architecture
//!
//! ```text
//! TaisenClient (entry point)
//!   │
//!   ├── WalletSession
//!   │     ├── WalletRegistry (providers announce themselves at any time)
//!   │     └── IntentStore (last wallet, explicit disconnect)
//!   │
//!   └── TournamentService
//!         ├── SuiRpc (sui_getObject, suix_queryEvents, suix_getDynamicFields)
//!         ├── TtlCache (listing, 30 s)
//!         └── tx builders → WalletSession::sign_and_execute
//! ```
//!
//! # Reads and writes
//!
//! | Operation | Method | Chain access |
//! |-----------|--------|--------------|
//! | list | `fetch_all_tournaments()` | events + object per tournament |
//! | detail | `fetch_tournament(id)` | one object |
//! | bracket | `fetch_bracket(id)` | object + match table |
//! | register | `register_for_tournament(..)` | signed transaction |
//! | create | `create_tournament(..)` | signed transaction |
//! | start | `start_tournament(..)` | signed transaction |
//! | report | `report_match_result(..)` | signed transaction |
//!
//! # Features
//!
//! - `native` - JSON-RPC over HTTP, file-backed wallet intent, log output, CLI
//!
//! # Usage
//!
//! ```ignore
//! use taisen::{Network, TaisenClient, TaisenConfig};
//!
//! let mut client = TaisenClient::from_config(
//!     TaisenConfig::new("taisen")
//!         .with_network(Network::Testnet)
//!         .with_package("0x...")
//! );
//! client.start();
//!
//! let listing = client.tournaments().fetch_all_tournaments().await;
//! ```

pub mod chain;
pub mod client;
pub mod core;
pub mod model;
pub mod runtime;
pub mod tournaments;
pub mod tx;
pub mod wallet;

#[cfg(feature = "native")]
pub mod logging;

pub use chain::{Network, SuiRpc};
pub use client::{TaisenClient, TaisenConfig};
pub use crate::core::{TaisenError, TaisenResult};
pub use model::{Bracket, Match, Tournament, TournamentDisplay, TournamentStatus};
pub use runtime::Shutdown;
pub use tournaments::TournamentService;
pub use tx::{ContractIds, CreateTournamentParams, Transaction};
pub use wallet::{WalletAccount, WalletProvider, WalletRegistry, WalletSession};

#[cfg(feature = "native")]
pub use chain::JsonRpcClient;
