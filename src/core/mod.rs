//! Shared building blocks: names, errors, identifiers.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{TaisenError, TaisenResult};
