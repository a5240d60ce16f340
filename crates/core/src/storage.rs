//! Key-value storage backends for the token store
//!
//! Writes go through `set_many`/`remove_many` so a backend can apply a whole
//! batch under one lock (or one file replacement). Readers never observe half
//! of a batch.

use crate::error::{CoreError, CoreResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use tracing::warn;

/// String key-value storage
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write every entry in one step
    fn set_many(&self, entries: &[(&str, String)]) -> CoreResult<()>;

    /// Remove every key in one step. Missing keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> CoreResult<()>;
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> CoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in batch {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> CoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// JSON file storage.
///
/// The whole map is rewritten to a sibling temp file and renamed over the
/// original, so a crash mid-write leaves the previous contents intact. The
/// file is created with 0600 permissions on Unix.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(CoreError::storage_error(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Like `load`, but contents that do not parse are discarded so the next
    /// write replaces them. The flag reports whether that happened.
    fn load_for_write(&self) -> CoreResult<(BTreeMap<String, String>, bool)> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(CoreError::Serialization { message }) => {
                warn!(
                    path = %self.path.display(),
                    error = %message,
                    "Discarding unreadable storage file"
                );
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("tmp");

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp_path).map_err(|e| {
            CoreError::storage_error(format!("Failed to open {}: {e}", tmp_path.display()))
        })?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_many(&self, batch: &[(&str, String)]) -> CoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, _) = self.load_for_write()?;
        for (key, value) in batch {
            entries.insert((*key).to_string(), value.clone());
        }
        self.store(&entries)
    }

    fn remove_many(&self, keys: &[&str]) -> CoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, discarded) = self.load_for_write()?;
        let mut changed = discarded;
        for key in keys {
            changed |= entries.remove(*key).is_some();
        }
        if !changed {
            return Ok(());
        }
        self.store(&entries)
    }
}

/// Browser `localStorage`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        use gloo::storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| CoreError::storage_error(format!("localStorage read failed: {e:?}")))
    }

    fn set_many(&self, batch: &[(&str, String)]) -> CoreResult<()> {
        use gloo::storage::{LocalStorage, Storage};
        let storage = LocalStorage::raw();
        for (key, value) in batch {
            storage.set_item(key, value).map_err(|e| {
                CoreError::storage_error(format!("localStorage write failed: {e:?}"))
            })?;
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> CoreResult<()> {
        use gloo::storage::{LocalStorage, Storage};
        let storage = LocalStorage::raw();
        for key in keys {
            storage.remove_item(key).map_err(|e| {
                CoreError::storage_error(format!("localStorage delete failed: {e:?}"))
            })?;
        }
        Ok(())
    }
}
