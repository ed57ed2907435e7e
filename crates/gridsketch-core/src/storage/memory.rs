//! In-memory storage implementation.

use super::{BlobStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl BlobStore for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<String> {
        let blobs = self.blobs.read().map_err(lock_error)?;
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut blobs = self.blobs.write().map_err(lock_error)?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut blobs = self.blobs.write().map_err(lock_error)?;
        blobs.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let blobs = self.blobs.read().map_err(lock_error)?;
        Ok(blobs.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let storage = MemoryStorage::new();
        storage.put("lines", "[]").unwrap();
        assert_eq!(storage.get("lines").unwrap(), "[]");

        storage.put("lines", "[1]").unwrap();
        assert_eq!(storage.get("lines").unwrap(), "[1]");
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.get("nonexistent"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_remove() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("lines").unwrap());
        storage.put("lines", "[]").unwrap();
        assert!(storage.exists("lines").unwrap());

        storage.remove("lines").unwrap();
        assert!(!storage.exists("lines").unwrap());
        // Removing again is fine
        storage.remove("lines").unwrap();
        assert!(storage.is_empty());
    }
}
