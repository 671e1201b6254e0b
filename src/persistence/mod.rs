//! Save/load persistence with offline earnings
//!
//! Features:
//! - String-keyed blob `Store` (LocalStorage on web, memory natively)
//! - Flat JSON save format, merged over fresh defaults on load
//! - Offline earnings credited from the rate that was saved
//! - Corrupt saves are discarded instead of crash-looping

#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod save;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use save::{LoadOutcome, load_state, save_state};

/// Errors reported by a persistence store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage is disabled or missing in this environment.
    #[error("storage unavailable")]
    Unavailable,

    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },

    /// Write rejected (quota exceeded, storage disabled, ...).
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },

    #[error("failed to remove `{key}`: {reason}")]
    Remove { key: String, reason: String },

    /// Game state could not be serialized.
    #[error("failed to encode save: {0}")]
    Encode(String),
}

/// Synchronous string-keyed blob store
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store with an optional size quota
///
/// Clones share the same contents, so a test can hand one clone to the engine
/// and inspect what was written through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any write that would push total stored bytes past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Rc::default(),
            quota_bytes: Some(bytes),
        }
    }

    /// Store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::Write {
                    key: key.to_string(),
                    reason: format!("quota exceeded ({needed} > {quota} bytes)"),
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), Ok(None));
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Ok(Some("v".to_string())));
        store.remove("k").unwrap();
        assert!(!store.contains("k"));
    }

    #[test]
    fn test_memory_store_clones_share_contents() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("save", "{}").unwrap();
        assert!(store.contains("save"));
    }

    #[test]
    fn test_quota_rejects_large_writes() {
        let mut store = MemoryStore::with_quota(10);
        assert!(store.set("k", "123456789").is_ok());
        // Overwriting the same key only counts the new value
        assert!(store.set("k", "987654321").is_ok());
        let err = store.set("k", "1234567890").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.get("k"), Ok(Some("987654321".to_string())));
    }
}
