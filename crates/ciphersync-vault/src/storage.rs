//! `KeyValueStorage` implementations.
//!
//! - `InMemoryStorage` keeps values in a shared map. Clones observe the same
//!   map, so a test can hydrate a second store from what the first wrote.
//! - `FileStorage` keeps one `<key>.json` file per key in a directory. Writes
//!   go to a temporary sibling that is then renamed over the target, so a
//!   reader sees either the old value or the new one, never a torn write.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tracing::debug;

use ciphersync_contracts::error::{CipherError, CipherResult};
use ciphersync_core::traits::KeyValueStorage;

// ── In-memory ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

/// Map-backed storage for tests.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<MemoryState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `value` under `key`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut values) = storage.state.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }

    /// Make every subsequent `write` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw value under `key`, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state
            .values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn read(&self, key: &str) -> CipherResult<Option<String>> {
        let values = self.state.values.lock().map_err(|e| CipherError::Storage {
            reason: format!("storage lock poisoned: {e}"),
        })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> CipherResult<()> {
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(CipherError::Storage {
                reason: format!("write to '{key}' rejected"),
            });
        }
        let mut values = self.state.values.lock().map_err(|e| CipherError::Storage {
            reason: format!("storage lock poisoned: {e}"),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────────────

/// Directory-backed storage: one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file holding `key`.
    ///
    /// Keys are plain names; anything that could escape the directory is
    /// rejected.
    pub fn path_for(&self, key: &str) -> CipherResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CipherError::Storage {
                reason: format!("invalid storage key '{key}'"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> CipherResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CipherError::Storage {
                reason: format!("failed to read '{}': {e}", path.display()),
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> CipherResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let storage_err = |action: &str, p: &Path, e: io::Error| CipherError::Storage {
            reason: format!("failed to {action} '{}': {e}", p.display()),
        };

        fs::create_dir_all(&self.dir).map_err(|e| storage_err("create", &self.dir, e))?;
        fs::write(&tmp, value).map_err(|e| storage_err("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_err("replace", &path, e))?;

        debug!(path = %path.display(), bytes = value.len(), "storage value replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ciphersync_core::traits::KeyValueStorage;

    use super::{FileStorage, InMemoryStorage};

    #[test]
    fn file_storage_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.read("ciphersync_audit_vault").unwrap(), None);
    }

    #[test]
    fn file_storage_write_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.write("vault", "[1]").unwrap();
        storage.write("vault", "[1,2]").unwrap();

        assert_eq!(storage.read("vault").unwrap().as_deref(), Some("[1,2]"));
        assert!(!dir.path().join("nested").join(".vault.json.tmp").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.write("../escape", "x").is_err());
        assert!(storage.read("a/b").is_err());
        assert!(storage.read("").is_err());
    }

    #[test]
    fn in_memory_clones_share_values() {
        let storage = InMemoryStorage::new();
        let other = storage.clone();
        storage.write("k", "v").unwrap();
        assert_eq!(other.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn in_memory_write_failure_keeps_old_value() {
        let storage = InMemoryStorage::with_value("k", "old");
        storage.set_fail_writes(true);
        assert!(storage.write("k", "new").is_err());
        assert_eq!(storage.raw("k").as_deref(), Some("old"));
    }
}
