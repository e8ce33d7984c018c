//! Chain access: the read-side RPC seam and its JSON-RPC implementation.
//!
//! # Architecture
//!
//! ```text
//! TournamentService ──► SuiRpc (trait)
//!                          │
//!                          ├── JsonRpcClient (reqwest, native)
//!                          └── test fakes
//! ```
//!
//! # Methods
//!
//! | Trait method | JSON-RPC method |
//! |--------------|-----------------|
//! | `get_object` | `sui_getObject` |
//! | `query_events` | `suix_queryEvents` |
//! | `get_dynamic_fields` | `suix_getDynamicFields` |
//! | `get_owned_objects` | `suix_getOwnedObjects` |

mod network;
mod rpc;
#[cfg(feature = "native")]
mod client;

pub use network::Network;
pub use rpc::{find_owned_object, DynamicFieldInfo, EventCursor, Page, SuiEvent, SuiRpc};
#[cfg(feature = "native")]
pub use client::JsonRpcClient;
