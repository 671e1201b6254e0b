//! LocalStorage-backed store (WASM only)

use web_sys::Storage;

use super::{Store, StoreError};

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl Store for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|e| StoreError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(|e| StoreError::Remove {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}
