//! Durable key/value storage
//!
//! Session tokens, the serialized user record, and preference blobs survive
//! restarts through this module. The trait keeps the persistence backend
//! swappable: production uses a JSON file next to the application data,
//! tests use the in-memory store.

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable string-keyed storage
///
/// Values are opaque strings; callers serialize structured data (JSON)
/// before storing. All operations are async because the file-backed
/// implementation persists on every write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value.
    ///
    /// # Returns
    /// `Ok(None)` when the key has never been set or was removed.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store a value, overwriting any prior value for the key.
    ///
    /// # Errors
    /// Returns an error if persisting fails; the store's in-memory view may
    /// still have been updated.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Whether a key currently has a value.
    async fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
