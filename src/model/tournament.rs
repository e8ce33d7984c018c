//! Tournament and Match parsed from Sui JSON-RPC object content.
//!
//! Parsing is lenient: Move structs come back with u64 values as strings,
//! balances wrapped in `Balance { value }`, and options as `{ vec: [..] }`.
//! Missing fields default rather than fail, so a contract upgrade that adds
//! or drops a field does not blank the whole listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => TournamentStatus::InProgress,
            2 => TournamentStatus::Completed,
            3 => TournamentStatus::Cancelled,
            _ => TournamentStatus::Open,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            TournamentStatus::Open => 0,
            TournamentStatus::InProgress => 1,
            TournamentStatus::Completed => 2,
            TournamentStatus::Cancelled => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => MatchStatus::InProgress,
            2 => MatchStatus::Completed,
            _ => MatchStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub address: String,
    pub username: String,
}

/// One bracket slot. Owned and mutated by the contract; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: u64,
    pub round: u32,
    pub player_a: Option<String>,
    pub player_b: Option<String>,
    pub winner: Option<String>,
    pub status: MatchStatus,
    pub next_match_id: Option<u64>,
    /// 0 feeds `player_a` of the next match, 1 feeds `player_b`
    pub next_match_slot: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub is_remote: bool,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_country: String,
    /// Single-string venue written by older contract versions
    pub location: String,
    /// Start time, ms since epoch
    pub date: u64,
    pub game_type: String,
    pub description: String,
    pub entry_fee: u64,
    pub gm_fee_bps: u16,
    pub sponsor_pool: u64,
    pub player_pool: u64,
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
    pub winner: Option<String>,
    pub game_master: String,
    pub current_round: u32,
    pub total_rounds: u32,
    /// Attached on demand by `TournamentService::fetch_matches`
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub matches_table_id: Option<String>,
}

impl Tournament {
    /// Parse a `sui_getObject` response (or its `data` member).
    pub fn from_object(obj: &Value) -> Self {
        let data = obj.get("data").filter(|d| d.is_object()).unwrap_or(obj);
        let empty = Value::Object(Default::default());
        let fields = data
            .pointer("/content/fields")
            .unwrap_or(&empty);

        Self {
            id: str_at(data, "objectId"),
            name: str_at(fields, "name"),
            is_remote: bool_at(fields, "is_remote"),
            venue_address: str_at(fields, "venue_address"),
            venue_city: str_at(fields, "venue_city"),
            venue_country: str_at(fields, "venue_country"),
            location: str_at(fields, "location"),
            date: fields.get("date").and_then(as_u64).unwrap_or(0),
            game_type: str_at(fields, "game_type"),
            description: str_at(fields, "description"),
            entry_fee: fields.get("entry_fee").and_then(as_u64).unwrap_or(0),
            gm_fee_bps: fields
                .get("gm_fee_bps")
                .and_then(as_u64)
                .and_then(|v| u16::try_from(v).ok())
                .unwrap_or(0),
            sponsor_pool: fields.get("sponsor_pool").and_then(balance).unwrap_or(0),
            player_pool: fields.get("player_pool").and_then(balance).unwrap_or(0),
            participants: fields.get("participants").map(participants).unwrap_or_default(),
            status: TournamentStatus::from_u8(
                fields.get("status").and_then(as_u64).unwrap_or(0).min(u8::MAX as u64) as u8,
            ),
            winner: fields.get("winner").and_then(optional_address),
            game_master: str_at(fields, "game_master"),
            current_round: u32_at(fields, "current_round"),
            total_rounds: u32_at(fields, "total_rounds"),
            matches: Vec::new(),
            matches_table_id: fields
                .pointer("/matches/fields/id/id")
                .and_then(Value::as_str)
                .map(String::from),
        }
    }

    pub fn total_pool(&self) -> u64 {
        self.sponsor_pool.saturating_add(self.player_pool)
    }

    pub fn is_participant(&self, address: &str) -> bool {
        self.participants
            .iter()
            .any(|p| crate::core::ids::same(&p.address, address))
    }

    pub fn username_of(&self, address: &str) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| crate::core::ids::same(&p.address, address))
            .map(|p| p.username.as_str())
            .filter(|u| !u.is_empty())
    }

    /// Human venue line: "Remote" for online events, otherwise the joined
    /// non-empty venue parts (legacy `location` as fallback).
    pub fn venue(&self) -> String {
        if self.is_remote {
            return "Remote".into();
        }
        let parts: Vec<&str> = [&self.venue_address, &self.venue_city, &self.venue_country]
            .into_iter()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() { self.location.clone() } else { parts.join(", ") }
    }
}

impl Match {
    /// Parse a dynamic field object holding a match (`Field<u64, Match>`).
    pub fn from_field_object(obj: &Value) -> Option<Self> {
        let data = obj.get("data").filter(|d| d.is_object()).unwrap_or(obj);
        let field = data.pointer("/content/fields")?;
        let value = field
            .pointer("/value/fields")
            .unwrap_or(field);

        let match_id = value
            .get("match_id")
            .and_then(as_u64)
            .or_else(|| field.get("name").and_then(as_u64))?;

        Some(Self {
            match_id,
            round: u32_at(value, "round"),
            player_a: value.get("player_a").and_then(optional_address),
            player_b: value.get("player_b").and_then(optional_address),
            winner: value.get("winner").and_then(optional_address),
            status: MatchStatus::from_u8(
                value.get("status").and_then(as_u64).unwrap_or(0).min(u8::MAX as u64) as u8,
            ),
            next_match_id: value.get("next_match_id").and_then(optional_u64),
            next_match_slot: value
                .get("next_match_slot")
                .and_then(as_u64)
                .map(|v| if v == 0 { 0 } else { 1 })
                .unwrap_or(0),
        })
    }
}

fn str_at(v: &Value, key: &str) -> String {
    v.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn bool_at(v: &Value, key: &str) -> bool {
    match v.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

fn u32_at(v: &Value, key: &str) -> u32 {
    v.get(key)
        .and_then(as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// u64 from a JSON number or a decimal string.
pub(crate) fn as_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// `Balance<SUI>` renders as `{ fields: { balance } }`, `{ value }` or a bare number.
fn balance(v: &Value) -> Option<u64> {
    as_u64(v)
        .or_else(|| v.pointer("/fields/balance").and_then(as_u64))
        .or_else(|| v.pointer("/fields/value").and_then(as_u64))
        .or_else(|| v.get("value").and_then(as_u64))
}

/// `Option<T>` renders as null, the bare value, `{ vec: [..] }` or `{ fields: { vec: [..] } }`.
fn unwrap_option(v: &Value) -> Option<&Value> {
    match v {
        Value::Null => None,
        Value::Object(_) => {
            let vec = v.get("vec").or_else(|| v.pointer("/fields/vec"))?;
            vec.as_array()?.first()
        }
        other => Some(other),
    }
}

fn optional_address(v: &Value) -> Option<String> {
    unwrap_option(v)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn optional_u64(v: &Value) -> Option<u64> {
    unwrap_option(v).and_then(as_u64)
}

fn participants(v: &Value) -> Vec<Participant> {
    let Some(items) = v.as_array() else { return Vec::new() };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(address) => Some(Participant { address: address.clone(), username: String::new() }),
            Value::Object(_) => {
                let inner = item.get("fields").unwrap_or(item);
                let address = inner.get("address").and_then(Value::as_str)?;
                Some(Participant {
                    address: address.to_string(),
                    username: str_at(inner, "username"),
                })
            }
            _ => None,
        })
        .collect()
}
