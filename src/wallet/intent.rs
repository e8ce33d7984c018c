//! Persisted connection intent: which wallet the user last used and whether
//! they explicitly disconnected. Nothing else about a session survives a
//! restart.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

use crate::core::constants::storage;
use crate::core::error::TaisenResult;

/// Values stored under the storage keys; the flag is kept as the string
/// `"true"` to stay readable by the web client sharing the same keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "taisen_last_wallet", default, skip_serializing_if = "Option::is_none")]
    pub last_wallet: Option<String>,
    #[serde(rename = "taisen_wallet_disconnected", default, skip_serializing_if = "Option::is_none")]
    pub disconnected: Option<String>,
}

impl Intent {
    pub fn is_disconnected(&self) -> bool { self.disconnected.as_deref() == Some("true") }
}

pub trait IntentStore: Send + Sync {
    fn load(&self) -> TaisenResult<Intent>;
    fn save(&self, intent: &Intent) -> TaisenResult<()>;

    fn last_wallet(&self) -> TaisenResult<Option<String>> { Ok(self.load()?.last_wallet) }

    fn set_last_wallet(&self, name: Option<&str>) -> TaisenResult<()> {
        let mut intent = self.load()?;
        intent.last_wallet = name.map(String::from);
        self.save(&intent)
    }

    fn is_disconnected(&self) -> TaisenResult<bool> { Ok(self.load()?.is_disconnected()) }

    fn set_disconnected(&self, disconnected: bool) -> TaisenResult<()> {
        let mut intent = self.load()?;
        intent.disconnected = disconnected.then(|| "true".to_string());
        self.save(&intent)
    }
}

#[derive(Debug, Default)]
pub struct MemoryIntentStore {
    intent: Mutex<Intent>,
}

impl MemoryIntentStore {
    pub fn new() -> Self { Self::default() }
    pub fn with_intent(intent: Intent) -> Self { Self { intent: Mutex::new(intent) } }
}

impl IntentStore for MemoryIntentStore {
    fn load(&self) -> TaisenResult<Intent> { Ok(self.intent.lock().unwrap_or_else(PoisonError::into_inner).clone()) }
    fn save(&self, intent: &Intent) -> TaisenResult<()> {
        *self.intent.lock().unwrap_or_else(PoisonError::into_inner) = intent.clone();
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileIntentStore;

#[cfg(feature = "native")]
mod file {
    use super::*;
    use std::path::{Path, PathBuf};

    /// JSON file under `$TAISEN_ROOT/<app>/` (platform data dir by default).
    #[derive(Debug, Clone)]
    pub struct FileIntentStore {
        path: PathBuf,
    }

    impl FileIntentStore {
        pub fn open(app: &str) -> Self {
            let root = std::env::var("TAISEN_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")));
            Self { path: root.join(app).join(storage::INTENT_FILE) }
        }

        pub fn at(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

        pub fn path(&self) -> &Path { &self.path }
    }

    impl IntentStore for FileIntentStore {
        fn load(&self) -> TaisenResult<Intent> {
            if !self.path.exists() {
                return Ok(Intent::default());
            }
            let raw = std::fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&raw)?)
        }

        fn save(&self, intent: &Intent) -> TaisenResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, serde_json::to_string_pretty(intent)?)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_in_memory() {
        let store = MemoryIntentStore::new();
        assert!(!store.is_disconnected().unwrap());
        store.set_disconnected(true).unwrap();
        store.set_last_wallet(Some("Slush")).unwrap();
        assert!(store.is_disconnected().unwrap());
        assert_eq!(store.last_wallet().unwrap().as_deref(), Some("Slush"));
        store.set_disconnected(false).unwrap();
        assert_eq!(store.load().unwrap().disconnected, None);
    }

    #[test]
    fn uses_storage_key_names() {
        let json = serde_json::to_value(Intent { last_wallet: Some("Slush".into()), disconnected: Some("true".into()) }).unwrap();
        assert_eq!(json[storage::LAST_WALLET_KEY], "Slush");
        assert_eq!(json[storage::DISCONNECTED_KEY], "true");
    }

    #[cfg(feature = "native")]
    #[test]
    fn file_store_persists() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = FileIntentStore::at(dir.path().join("nested").join("intent.json"));
        assert_eq!(store.load().unwrap(), Intent::default());
        store.set_last_wallet(Some("Phantom")).unwrap();

        let reopened = FileIntentStore::at(store.path().to_path_buf());
        assert_eq!(reopened.last_wallet().unwrap().as_deref(), Some("Phantom"));
        assert!(!reopened.is_disconnected().unwrap());
    }
}
