//! In-process stand-ins for the browser collaborators.

use furnmart_core::environment::{History, Storage, StorageError};
use std::collections::HashMap;
use std::sync::Mutex;

/// `localStorage` for the lifetime of the process
#[derive(Debug, Default)]
pub struct SessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage {
    /// Creates an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for SessionStorage {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .insert(key.to_string(), payload.to_string());
        tracing::debug!(key, bytes = payload.len(), "Saved to session storage");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .get(key)
            .cloned())
    }
}

/// Address bar that prints every rewrite
#[derive(Debug, Clone)]
pub struct ConsoleHistory {
    pathname: String,
}

impl ConsoleHistory {
    /// Creates a history for the page at `pathname`
    #[must_use]
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}

impl History for ConsoleHistory {
    fn replace_search(&self, search: &str) {
        println!("  url: {}{search}", self.pathname);
    }
}
