//! Error type shared by every layer of the client.

use thiserror::Error;

pub type TaisenResult<T> = Result<T, TaisenError>;

#[derive(Debug, Error)]
pub enum TaisenError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Wallet {0} not found")]
    WalletNotFound(String),

    #[error("{0} wallet not available")]
    SocialLoginUnavailable(String),

    #[error("Login window was closed or blocked. Please try again.")]
    LoginWindowClosed,

    #[error("Wallet does not support {0}")]
    UnsupportedFeature(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("No active account")]
    NoAccount,

    #[error("wallet: {0}")]
    Wallet(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for TaisenError {
    fn from(e: serde_json::Error) -> Self {
        TaisenError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for TaisenError {
    fn from(e: std::io::Error) -> Self {
        TaisenError::Storage(e.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for TaisenError {
    fn from(e: reqwest::Error) -> Self {
        TaisenError::Transport(e.to_string())
    }
}
