//! Name and constant registry for the tournament contract and the client.
//!
//! Centralized so call sites never spell a Move target or a storage key
//! by hand.

use std::time::Duration;

/// Move modules and functions invoked by the client
pub mod contract {
    pub const TOURNAMENT_MODULE: &str = "tournament";
    pub const TOURNAMENT_STRUCT: &str = "Tournament";

    pub const CREATE_TOURNAMENT: &str = "create_tournament";
    pub const REGISTER: &str = "register";
    pub const START_TOURNAMENT: &str = "start_tournament";
    pub const REPORT_MATCH_RESULT: &str = "report_match_result";

    pub const TOURNAMENT_CREATED_EVENT: &str = "TournamentCreated";

    pub const PLATFORM_CONFIG_MODULE: &str = "platform_config";
    pub const ADMIN_CAP_STRUCT: &str = "AdminCap";

    /// Number of arguments `create_tournament` takes, payment coin included
    pub const CREATE_TOURNAMENT_ARITY: usize = 13;
}

/// Wallet-standard feature names
pub mod features {
    pub const CONNECT: &str = "standard:connect";
    pub const DISCONNECT: &str = "standard:disconnect";
    pub const EVENTS: &str = "standard:events";
    pub const SIGN_AND_EXECUTE: &str = "sui:signAndExecuteTransaction";
}

/// Chain identifiers
pub mod chains {
    pub const SUI_PREFIX: &str = "sui:";
    pub const CONNECT_CHAINS: &[&str] = &["sui:mainnet", "sui:testnet", "sui:devnet"];
}

/// Social login (zkLogin) providers
pub mod social {
    pub const GOOGLE: &str = "google";
    /// Wallet error text when the OAuth popup goes away before completing
    pub const POPUP_CLOSED: &str = "Popup closed";
}

/// Persisted intent keys
pub mod storage {
    pub const DISCONNECTED_KEY: &str = "taisen_wallet_disconnected";
    pub const LAST_WALLET_KEY: &str = "taisen_last_wallet";
    pub const INTENT_FILE: &str = "wallet-intent.json";
}

/// Display assets
pub mod assets {
    pub const DEFAULT_BANNER: &str = "/images/banners/default.webp";
}

pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Platform creation fee charged by `create_tournament` (1 SUI)
pub const DEFAULT_CREATION_FEE: u64 = MIST_PER_SUI;

/// Maximum game master fee in basis points
pub const MAX_FEE_BPS: u16 = 10_000;

pub const CACHE_TTL: Duration = Duration::from_secs(30);

/// Page size for event walks
pub const EVENT_PAGE_LIMIT: usize = 50;

/// Delay before the first reconcile, gives wallet providers time to register
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);
