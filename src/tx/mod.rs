//! Programmable transactions: a minimal builder plus the tournament calls.
//!
//! Output mirrors the JSON the Sui TypeScript SDK produces from
//! `Transaction.getData()`, so wallets that accept that shape can sign it.

mod bcs;
mod builder;
mod tournament;

pub use builder::{Argument, CallArg, Command, MoveCall, Transaction, TransactionData};
pub use tournament::{
    build_create_tournament_tx, build_register_tx, build_report_match_result_tx, build_start_tournament_tx,
    ContractIds, CreateTournamentParams,
};
