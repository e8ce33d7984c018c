//! Wallet module - browser-style wallet sessions over wallet-standard providers
//!
//! # Architecture
//!
//! ```text
//! WalletRegistry ──(Registered / Unregistered)──► reconciler task
//!     │                                               │
//!     └── WalletProvider (connect, disconnect,        ▼
//!           events, signAndExecute)  ◄──────── WalletSession
//!                                                     │
//!                                                     ▼
//!                                        IntentStore (last wallet,
//!                                        explicitly disconnected)
//! ```
//!
//! # Session rules
//!
//! | Trigger | Effect |
//! |---------|--------|
//! | `connect(name)` | clears disconnected flag, remembers `name` on success |
//! | `connect_social(provider)` | `connect` on the social wallet for `provider` |
//! | `disconnect()` | sets disconnected flag, clears session |
//! | registry event | `reconcile()` |
//! | wallet `change` event | first account becomes active, none resets |

mod intent;
mod provider;
mod registry;
mod session;

pub use intent::{Intent, IntentStore, MemoryIntentStore};
#[cfg(feature = "native")]
pub use intent::FileIntentStore;
pub use provider::{
    has_events, is_social_wallet, is_sui_wallet, sui_accounts, ExecutionResult, WalletAccount, WalletEvent, WalletKind,
    WalletProvider,
};
pub use registry::{RegistryEvent, WalletRegistry};
pub use session::{SessionSnapshot, WalletSession};
