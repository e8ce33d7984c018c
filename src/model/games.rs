//! Supported games. Slugs must match what the game registry on chain holds.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub title: &'static str,
    pub slug: &'static str,
    pub banner: &'static str,
    pub logo: &'static str,
    pub description: &'static str,
}

const BUILTIN: &[Game] = &[
    Game {
        title: "Yu-Gi-Oh!",
        slug: "yu-gi-oh",
        banner: "/images/banners/yugioh.webp",
        logo: "/images/game-icons/yugioh.webp",
        description: "Yu-Gi-Oh! is a trading card game developed by Konami where two players duel using decks of Monster, Spell, and Trap cards.",
    },
    Game {
        title: "Magic: The Gathering",
        slug: "magic-the-gathering",
        banner: "/images/banners/mtg.webp",
        logo: "/images/game-icons/mtg.webp",
        description: "Magic: The Gathering is a collectible card game published by Wizards of the Coast since 1993.",
    },
    Game {
        title: "Shadowverse: Evolve",
        slug: "shadowverse",
        banner: "/images/banners/shadowverse.webp",
        logo: "/images/game-icons/shadowverse.webp",
        description: "Shadowverse: Evolve is a competitive TCG by Bushiroad based on the digital card game Shadowverse.",
    },
    Game {
        title: "Riftbound",
        slug: "riftbound",
        banner: "/images/banners/riftbound.webp",
        logo: "/images/game-icons/riftbound.webp",
        description: "Riftbound is a trading card game by Riot Games set in the League of Legends universe.",
    },
];

#[derive(Debug, Clone)]
pub struct GameCatalog {
    games: Vec<Game>,
}

impl Default for GameCatalog {
    fn default() -> Self { Self::builtin() }
}

impl GameCatalog {
    pub fn builtin() -> Self {
        Self { games: BUILTIN.to_vec() }
    }

    pub fn with_games(games: Vec<Game>) -> Self { Self { games } }

    pub fn all(&self) -> &[Game] { &self.games }

    pub fn by_slug(&self, slug: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.slug == slug)
    }
}
