//! Key-value persistence sinks.
//!
//! The editor stores its whole element list as one JSON blob under
//! [`ELEMENTS_KEY`]. Sinks only need `get` and `set`; writes always replace
//! the previous value wholesale.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Key the element list is stored under.
pub const ELEMENTS_KEY: &str = "elements";

/// Errors raised by a persistence sink.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The sink refused the operation (quota, read-only medium, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A blob store addressed by string keys.
pub trait KeyValueStore {
    /// Read the blob stored under `key`, or `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory sink for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Filesystem sink: one `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `data_dir`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// The directory blobs are written to.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", sanitize_filename(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        tracing::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Sanitize a key for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get(ELEMENTS_KEY).expect("get").is_none());
    }

    #[test]
    fn test_memory_set_overwrites() {
        let store = MemoryStore::new();
        store.set(ELEMENTS_KEY, "[1]").expect("set");
        store.set(ELEMENTS_KEY, "[2]").expect("set");
        assert_eq!(store.get(ELEMENTS_KEY).expect("get").as_deref(), Some("[2]"));
    }

    #[test]
    fn test_memory_with_entry() {
        let store = MemoryStore::with_entry(ELEMENTS_KEY, "[]");
        assert_eq!(store.get(ELEMENTS_KEY).expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn test_shared_arc_sees_writes() {
        let shared = Arc::new(MemoryStore::new());
        let handle = Arc::clone(&shared);
        handle.set("k", "v").expect("set");
        assert_eq!(shared.get("k").expect("get").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path()).expect("store");

        assert!(store.get(ELEMENTS_KEY).expect("get").is_none());
        store.set(ELEMENTS_KEY, "[]").expect("set");

        let path = dir.path().join("elements.json");
        assert!(path.exists(), "blob should be written to <key>.json");

        let reopened = FileStore::new(dir.path()).expect("reopen");
        assert_eq!(reopened.get(ELEMENTS_KEY).expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested).expect("store");
        assert!(nested.is_dir());
        assert_eq!(store.data_dir(), nested.as_path());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("elements"), "elements");
        assert_eq!(sanitize_filename("with-dash"), "with-dash");
        assert_eq!(sanitize_filename("with_under"), "with_under");
        assert_eq!(sanitize_filename("../escape"), "___escape");
        assert_eq!(sanitize_filename("has space"), "has_space");
    }
}
