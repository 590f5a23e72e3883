//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the key-value store inside the base directory.
pub const STORE_FILE: &str = "store.json";

/// File-based storage for native platforms.
///
/// All keys live in a single JSON object (`store.json`) in the base
/// directory. A missing file means every key is absent.
pub struct FileStorage {
    /// Base directory holding the store file.
    base_path: PathBuf,
    /// Serializes read-modify-write cycles on the store file.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/speakpad/`
    /// On Windows: `%LOCALAPPDATA%\speakpad\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("speakpad"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Path of the store file.
    pub fn store_path(&self) -> PathBuf {
        self.base_path.join(STORE_FILE)
    }
}

fn read_store(path: &Path) -> StorageResult<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let json = fs::read_to_string(path).map_err(|e| {
        StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, contents: &str) -> StorageResult<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents).map_err(|e| {
        StorageError::Io(format!("Failed to write {}: {}", tmp_path.display(), e))
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })
}

impl Storage for FileStorage {
    fn save(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.store_path();
        let key = key.to_string();
        let value = value.to_string();

        Box::pin(async move {
            let _guard = self.write_lock.lock().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;

            let mut values = match read_store(&path) {
                Ok(values) => values,
                Err(StorageError::Serialization(e)) => {
                    log::warn!("Discarding unreadable store: {}", e);
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            values.insert(key, value);

            let json = serde_json::to_string_pretty(&values)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            write_atomic(&path, &json)
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.store_path();
        let key = key.to_string();

        Box::pin(async move {
            let mut values = read_store(&path)?;
            Ok(values.remove(&key))
        })
    }
}
