//! Local key-value persistence for the cart blob.
//!
//! The contract matches browser `localStorage`: string keys, string values,
//! synchronous access. [`FileStore`] keeps one file per key on disk;
//! [`MemoryStore`] keeps everything in process memory.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key the serialized cart is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors from a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value was not stored. The previous value
    /// is left in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
