//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
    /// When set, every call fails with `StorageError::Unavailable`.
    unavailable: AtomicBool,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing store going away (or coming back).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            self.check_available()?;
            let mut values = self.values.write().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            values.insert(key, value);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            self.check_available()?;
            let values = self.values.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            Ok(values.get(&key).cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();

        block_on(storage.save("greeting", "hej")).unwrap();
        let loaded = block_on(storage.load("greeting")).unwrap();

        assert_eq!(loaded.as_deref(), Some("hej"));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let storage = MemoryStorage::new();
        let loaded = block_on(storage.load("nonexistent")).unwrap();

        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let storage = MemoryStorage::new();

        block_on(storage.save("k", "first")).unwrap();
        block_on(storage.save("k", "second")).unwrap();

        assert_eq!(block_on(storage.load("k")).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_unavailable_fails_both_ways() {
        let storage = MemoryStorage::new();
        block_on(storage.save("k", "kept")).unwrap();
        storage.set_unavailable(true);

        assert!(matches!(block_on(storage.save("k", "lost")), Err(StorageError::Unavailable(_))));
        assert!(matches!(block_on(storage.load("k")), Err(StorageError::Unavailable(_))));

        storage.set_unavailable(false);
        assert_eq!(block_on(storage.load("k")).unwrap().as_deref(), Some("kept"));
    }
}
