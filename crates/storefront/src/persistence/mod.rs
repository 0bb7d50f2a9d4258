//! Key-value persistence for the cart.
//!
//! The cart store only needs `get` and `set` on string values. Two backends
//! are provided:
//!
//! - [`MemoryStore`] - process-local, used by tests and throwaway sessions
//! - [`FileStore`] - one file per key under a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backend.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
