//! Browser `localStorage` backend for WASM.

use super::{BlobStore, StorageError, StorageResult};
use web_sys::Storage;

/// Blob store over `window.localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new() -> StorageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl BlobStore for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<String> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        self.storage
            .get_item(key)
            .map(|item| item.is_some())
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))
    }
}
