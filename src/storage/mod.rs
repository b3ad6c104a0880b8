//! Durable key-value storage port.
//!
//! Every store owns one key in this substrate and rewrites its whole
//! collection as a single value on each successful mutation, so two stores
//! are always independently consistent even without a cross-store
//! transaction.

mod file_storage;
mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Capability interface over the durable key-value substrate.
///
/// Values are raw JSON strings; interpreting them is the owning store's
/// concern. A `set` replaces the whole value under the key in one write.
pub trait StorageBackend: Send + Sync {
    /// Returns the value under `key`, or None if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the key entirely. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
