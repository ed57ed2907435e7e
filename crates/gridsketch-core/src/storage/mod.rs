//! Storage abstraction for persistence.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod localstorage;

pub use autosave::{AutoSaveManager, PlatformAutoSaveManager, WriteToken, create_autosave_manager};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use localstorage::LocalStorage;

use std::sync::Arc;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value store of text blobs.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`.
    fn get(&self, key: &str) -> StorageResult<String>;

    /// Write (or overwrite) the blob under `key`.
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the blob under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Key-value store of text blobs (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait BlobStore {
    fn get(&self, key: &str) -> StorageResult<String>;
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Storage backend for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = LocalStorage;

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(LocalStorage::new()?))
}
