//! In-memory collaborators for engine tests
//!
//! - [`InMemoryStorage`]: HashMap-backed [`Storage`]
//! - [`RejectingStorage`]: [`Storage`] whose writes always fail (quota exceeded)
//! - [`RecordingHistory`]: [`History`] that records every URL rewrite
//! - [`StallFirstWrite`]: wrapper whose first write blocks, to reorder
//!   concurrent effects

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use furnmart_core::environment::{History, Storage, StorageError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// In-memory key/value storage for fast, deterministic tests
///
/// # Example
///
/// ```
/// use furnmart_testing::InMemoryStorage;
/// use furnmart_core::environment::Storage;
///
/// let storage = InMemoryStorage::new();
/// storage.save("furnmart_cart", "{}").unwrap();
/// assert_eq!(storage.load("furnmart_cart").unwrap().as_deref(), Some("{}"));
/// assert_eq!(storage.writes(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<usize>>,
}

impl InMemoryStorage {
    /// Create a new empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-seeded with one entry
    #[must_use]
    pub fn with_entry(key: &str, payload: &str) -> Self {
        let storage = Self::new();
        storage
            .data
            .write()
            .unwrap()
            .insert(key.to_string(), payload.to_string());
        storage
    }

    /// Current payload under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Number of successful `save` calls
    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.read().unwrap()
    }

    /// Remove all entries (for test isolation)
    pub fn clear(&self) {
        self.data.write().unwrap().clear();
    }
}

impl Storage for InMemoryStorage {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), payload.to_string());
        *self.writes.write().unwrap() += 1;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }
}

/// Storage that rejects every write, like a browser over quota
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectingStorage;

impl Storage for RejectingStorage {
    fn save(&self, key: &str, _payload: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteRejected {
            key: key.to_string(),
            reason: "quota exceeded".to_string(),
        })
    }

    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

/// History that records every `replace_search` call
///
/// # Example
///
/// ```
/// use furnmart_testing::RecordingHistory;
/// use furnmart_core::environment::History;
///
/// let history = RecordingHistory::new();
/// history.replace_search("?category=chairs");
/// assert_eq!(history.current(), "?category=chairs");
/// assert_eq!(history.entries().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingHistory {
    entries: Arc<RwLock<Vec<String>>>,
}

impl RecordingHistory {
    /// Create a history with no recorded rewrites
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded search strings, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.read().unwrap().clone()
    }

    /// The latest search string (`""` before any rewrite)
    #[must_use]
    pub fn current(&self) -> String {
        self.entries.read().unwrap().last().cloned().unwrap_or_default()
    }
}

impl History for RecordingHistory {
    fn replace_search(&self, search: &str) {
        self.entries.write().unwrap().push(search.to_string());
    }
}

/// Blocks the first write passed to the wrapped collaborator
///
/// A store runs each effect as its own task. Stalling the first write lets a
/// later write overtake it on a multi-threaded runtime.
#[derive(Debug)]
pub struct StallFirstWrite<T> {
    inner: T,
    stall: Duration,
    stalled: AtomicBool,
}

impl<T> StallFirstWrite<T> {
    /// Wraps `inner`; its first write sleeps for `stall` before running
    #[must_use]
    pub const fn new(inner: T, stall: Duration) -> Self {
        Self {
            inner,
            stall,
            stalled: AtomicBool::new(false),
        }
    }

    fn stall_once(&self) {
        if !self.stalled.swap(true, Ordering::SeqCst) {
            std::thread::sleep(self.stall);
        }
    }
}

impl<T: Storage> Storage for StallFirstWrite<T> {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.stall_once();
        self.inner.save(key, payload)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }
}

impl<T: History> History for StallFirstWrite<T> {
    fn replace_search(&self, search: &str) {
        self.stall_once();
        self.inner.replace_search(search);
    }
}
