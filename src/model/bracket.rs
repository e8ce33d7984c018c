//! Bracket view built from a tournament's attached matches.
//!
//! Rounds are indexed relative to the lowest round number present, so the
//! view works whether the contract counts rounds from 0 or from 1.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::ids;
use crate::model::tournament::{Match, MatchStatus, Tournament};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketPlayerStatus {
    Winner,
    Loser,
    Playing,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMatchStatus {
    Completed,
    InProgress,
    Pending,
}

impl From<MatchStatus> for BracketMatchStatus {
    fn from(s: MatchStatus) -> Self {
        match s {
            MatchStatus::Completed => BracketMatchStatus::Completed,
            MatchStatus::InProgress => BracketMatchStatus::InProgress,
            MatchStatus::Pending => BracketMatchStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketPlayer {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub status: BracketPlayerStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketMatch {
    pub id: String,
    pub round_id: String,
    pub match_number: u32,
    pub players: [Option<BracketPlayer>; 2],
    pub status: BracketMatchStatus,
    pub next_match_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketRound {
    pub id: String,
    pub label: String,
    pub round_index: u32,
    pub is_active: bool,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bracket {
    pub rounds: Vec<BracketRound>,
    pub matches: Vec<BracketMatch>,
    pub active_round_id: String,
}

/// "Finals", "Semifinals", "Quarterfinals", else "Round N" (1-indexed).
pub fn round_label(round_index: u32, num_rounds: u32) -> String {
    if round_index + 1 == num_rounds {
        return "Finals".into();
    }
    if num_rounds >= 2 && round_index + 2 == num_rounds {
        return "Semifinals".into();
    }
    if num_rounds >= 4 && round_index + 3 == num_rounds {
        return "Quarterfinals".into();
    }
    format!("Round {}", round_index + 1)
}

fn round_id(index: u32) -> String { format!("round-{}", index) }
fn match_id(id: u64) -> String { format!("match-{}", id) }

impl Bracket {
    pub fn from_tournament(t: &Tournament) -> Self {
        let base = t.matches.iter().map(|m| m.round).min().unwrap_or(0);
        let highest = t.matches.iter().map(|m| m.round - base).max().map(|r| r + 1).unwrap_or(0);
        let num_rounds = highest.max(t.total_rounds);

        let mut by_round: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
        for m in &t.matches {
            by_round.entry(m.round - base).or_default().push(m);
        }

        let active = if num_rounds == 0 {
            0
        } else {
            t.current_round.saturating_sub(base).min(num_rounds - 1)
        };

        let mut matches = Vec::with_capacity(t.matches.len());
        for (index, round_matches) in by_round.iter_mut() {
            round_matches.sort_by_key(|m| m.match_id);
            for (n, m) in round_matches.iter().enumerate() {
                matches.push(BracketMatch {
                    id: match_id(m.match_id),
                    round_id: round_id(*index),
                    match_number: n as u32 + 1,
                    players: [
                        m.player_a.as_deref().map(|p| player(t, m, p)),
                        m.player_b.as_deref().map(|p| player(t, m, p)),
                    ],
                    status: m.status.into(),
                    next_match_id: m.next_match_id.map(match_id),
                });
            }
        }

        let rounds = (0..num_rounds)
            .map(|index| {
                let seeded = by_round
                    .get(&index)
                    .map(|ms| ms.iter().any(|m| m.player_a.is_some() || m.player_b.is_some()))
                    .unwrap_or(false);
                BracketRound {
                    id: round_id(index),
                    label: round_label(index, num_rounds),
                    round_index: index,
                    is_active: index == active,
                    is_disabled: index > active && !seeded,
                }
            })
            .collect();

        Self { rounds, matches, active_round_id: round_id(active) }
    }
}

fn player(t: &Tournament, m: &Match, address: &str) -> BracketPlayer {
    let won = m.winner.as_deref().map(|w| ids::same(w, address));
    let status = match (m.status, won) {
        (MatchStatus::Completed, Some(true)) => BracketPlayerStatus::Winner,
        (MatchStatus::Completed, _) => BracketPlayerStatus::Loser,
        (MatchStatus::InProgress, _) => BracketPlayerStatus::Playing,
        (MatchStatus::Pending, _) => BracketPlayerStatus::Pending,
    };
    BracketPlayer {
        id: address.to_string(),
        name: t
            .username_of(address)
            .map(String::from)
            .unwrap_or_else(|| ids::truncate(address)),
        score: u32::from(won == Some(true)),
        status,
    }
}
