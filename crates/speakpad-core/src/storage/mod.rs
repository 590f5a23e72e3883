//! Key-value persistence gateway.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStorage, STORE_FILE};

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async gateway calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// String key-value store.
///
/// A missing key is not an error: `load` resolves to `Ok(None)`.
pub trait Storage: Send + Sync {
    /// Write `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Read the value stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;
}

