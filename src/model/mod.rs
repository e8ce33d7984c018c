//! Model: on-chain objects parsed into client types, plus the views built
//! from them.
//!
//! ```text
//! sui_getObject JSON ──► Tournament::from_object ──► TournamentDisplay
//!                                  │
//! dynamic field JSON ──► Match ────┴──────────────► Bracket
//! ```

pub mod bracket;
pub mod display;
pub mod games;
pub mod tournament;

pub use bracket::{Bracket, BracketMatch, BracketMatchStatus, BracketPlayer, BracketPlayerStatus, BracketRound, round_label};
pub use display::{DisplayStatus, TournamentDisplay, display_status, format_sui, sort_for_listing};
pub use games::{Game, GameCatalog};
pub use tournament::{Match, MatchStatus, Participant, Tournament, TournamentStatus};
