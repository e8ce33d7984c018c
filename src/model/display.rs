//! Display model: what a tournament card shows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::core::constants::{assets, MIST_PER_SUI};
use crate::model::games::GameCatalog;
use crate::model::tournament::{Participant, Tournament, TournamentStatus};

const HOUR_MS: u64 = 60 * 60 * 1000;
const MINUTE_MS: u64 = 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayStatus {
    Live,
    Upcoming,
    Ended,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Live => "LIVE",
            DisplayStatus::Upcoming => "UPCOMING",
            DisplayStatus::Ended => "ENDED",
        }
    }

    fn priority(&self) -> u8 {
        match self {
            DisplayStatus::Live => 0,
            DisplayStatus::Upcoming => 1,
            DisplayStatus::Ended => 2,
        }
    }

    /// (status color, icon color)
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            DisplayStatus::Live => ("cyber-red", "text-cyber-red"),
            DisplayStatus::Upcoming => ("cyber-cyan", "text-cyber-cyan"),
            DisplayStatus::Ended => ("cyber-purple", "text-gray-500"),
        }
    }
}

/// Contract status to display status. An open tournament whose start time
/// has passed shows as live.
pub fn display_status(status: TournamentStatus, date_ms: u64, now_ms: u64) -> DisplayStatus {
    match status {
        TournamentStatus::Completed | TournamentStatus::Cancelled => DisplayStatus::Ended,
        TournamentStatus::InProgress => DisplayStatus::Live,
        TournamentStatus::Open if date_ms <= now_ms => DisplayStatus::Live,
        TournamentStatus::Open => DisplayStatus::Upcoming,
    }
}

/// MIST amount as a SUI string: `1.2k SUI`, `12.50 SUI`, `0.0010 SUI`.
pub fn format_sui(mist: u64) -> String {
    let sui = mist as f64 / MIST_PER_SUI as f64;
    if sui >= 1000.0 {
        format!("{:.1}k SUI", sui / 1000.0)
    } else if sui >= 1.0 {
        format!("{:.2} SUI", sui)
    } else {
        format!("{:.4} SUI", sui)
    }
}

/// Live first, then upcoming (soonest first), then ended (newest first).
/// Live and ended share the newest-first rule.
pub fn sort_for_listing(tournaments: &mut [Tournament], now_ms: u64) {
    tournaments.sort_by(|a, b| {
        let sa = display_status(a.status, a.date, now_ms);
        let sb = display_status(b.status, b.date, now_ms);
        match sa.priority().cmp(&sb.priority()) {
            Ordering::Equal if sa == DisplayStatus::Upcoming => a.date.cmp(&b.date),
            Ordering::Equal => b.date.cmp(&a.date),
            other => other,
        }
    });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentDisplay {
    pub id: String,
    pub title: String,
    pub game: String,
    pub image: String,
    pub status: DisplayStatus,
    pub prizepool: String,
    pub teams: String,
    pub countdown: String,
    pub status_color: String,
    pub icon_color: String,
    pub entry_fee: String,
    pub sponsor_pool: String,
    pub participants: Vec<Participant>,
    pub game_master: String,
    pub description: String,
    pub is_remote: bool,
    pub venue: String,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_country: String,
    pub date: Option<DateTime<Utc>>,
}

impl TournamentDisplay {
    pub fn from_tournament(t: &Tournament, games: &GameCatalog, now_ms: u64) -> Self {
        let status = display_status(t.status, t.date, now_ms);
        let (status_color, icon_color) = status.colors();
        let game = games.by_slug(&t.game_type);

        Self {
            id: t.id.clone(),
            title: t.name.clone(),
            game: game.map(|g| g.title.to_string()).unwrap_or_else(|| t.game_type.clone()),
            image: game
                .map(|g| g.banner.to_string())
                .unwrap_or_else(|| assets::DEFAULT_BANNER.to_string()),
            status,
            prizepool: format_sui(t.total_pool()),
            teams: t.participants.len().to_string(),
            countdown: countdown(status, t.date, now_ms),
            status_color: status_color.into(),
            icon_color: icon_color.into(),
            entry_fee: format_sui(t.entry_fee),
            sponsor_pool: format_sui(t.sponsor_pool),
            participants: t.participants.clone(),
            game_master: t.game_master.clone(),
            description: t.description.clone(),
            is_remote: t.is_remote,
            venue: t.venue(),
            venue_address: t.venue_address.clone(),
            venue_city: t.venue_city.clone(),
            venue_country: t.venue_country.clone(),
            date: date_of(t.date),
        }
    }
}

fn date_of(ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(ms).ok().and_then(DateTime::from_timestamp_millis)
}

fn date_label(ms: u64) -> String {
    date_of(ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Card subtitle. Upcoming events more than a day out show their date.
fn countdown(status: DisplayStatus, date_ms: u64, now_ms: u64) -> String {
    match status {
        DisplayStatus::Live => "Tournament in progress".into(),
        DisplayStatus::Upcoming => {
            let diff = date_ms.saturating_sub(now_ms);
            let hours = diff / HOUR_MS;
            let minutes = (diff % HOUR_MS) / MINUTE_MS;
            if hours > 24 {
                date_label(date_ms)
            } else {
                format!("Starts in {}h {}m", hours, minutes)
            }
        }
        DisplayStatus::Ended => date_label(date_ms),
    }
}
