// Local key-value store.
// Persists the response cache, refresh timestamp, theme, and dashboard URL.

pub mod file;
pub mod paths;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{FolioError, Result};

pub use file::FileStore;

/// Serialized response cache entries.
pub const CACHE_KEY: &str = "github-api-cache";
/// Epoch milliseconds of the last successful GitHub load.
pub const LAST_UPDATE_KEY: &str = "github-last-update";
/// `light` or `dark`.
pub const THEME_KEY: &str = "theme";
/// Dashboard embed URL chosen by the user.
pub const DASHBOARD_URL_KEY: &str = "dashboard-url";

/// Persisted string values addressed by key.
///
/// Every caller treats the store as best-effort: a failed read or write is
/// logged and the in-memory state carries on.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store, used when no cache directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| FolioError::Persistence(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| FolioError::Persistence(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| FolioError::Persistence(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}

/// A store whose writes always fail. Reads return whatever it was seeded with.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingStore {
    pub seeded: HashMap<String, String>,
}

#[cfg(test)]
impl LocalStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.seeded.get(key).cloned())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(FolioError::Persistence("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(FolioError::Persistence("quota exceeded".to_string()))
    }
}
