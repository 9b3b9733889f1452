//! Key-value persistence for the session pair.
//!
//! [`SessionStore`] is the seam between [`crate::SessionManager`] and
//! wherever the token lives. [`MemoryStore`] keeps it in process and
//! [`FileStore`] writes a JSON object into a capability-scoped directory.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::atomic_io;
use crate::error::StoreError;

/// Persistent string storage used by the session manager.
///
/// Implementations are called from synchronous code and must not block for
/// long; no lock is held while they run.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be updated.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// JSON object of string values stored in a single file.
///
/// The store only touches `file_name` inside the directory it was given.
/// Every update rewrites the file atomically.
#[derive(Debug)]
pub struct FileStore {
    dir: Dir,
    file_name: Utf8PathBuf,
    // Serialises read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileStore {
    /// Store backed by `file_name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when `file_name` is not a plain file name.
    pub fn new(dir: Dir, file_name: impl Into<Utf8PathBuf>) -> Result<Self, StoreError> {
        let file_name = file_name.into();
        let mut components = file_name.components();
        let (Some(Utf8Component::Normal(_)), None) = (components.next(), components.next())
        else {
            return Err(StoreError::Write {
                path: file_name,
                message: "session store path must be a file name".to_owned(),
            });
        };
        Ok(Self {
            dir,
            file_name,
            guard: Mutex::new(()),
        })
    }

    /// Open `directory` with ambient authority and store `file_name` there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the directory cannot be opened and
    /// [`StoreError::Write`] when `file_name` is not a plain file name.
    pub fn open_ambient(
        directory: &Utf8Path,
        file_name: impl Into<Utf8PathBuf>,
    ) -> Result<Self, StoreError> {
        let dir = Dir::open_ambient_dir(directory, ambient_authority()).map_err(|err| {
            StoreError::Read {
                path: directory.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        Self::new(dir, file_name)
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match self.dir.read_to_string(self.file_name.as_std_path()) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.file_name.clone(),
                    message: err.to_string(),
                });
            }
        };
        serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt {
            path: self.file_name.clone(),
            message: err.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_error = |message: String| StoreError::Write {
            path: self.file_name.clone(),
            message,
        };
        let json = serde_json::to_string_pretty(entries).map_err(|err| write_error(err.to_string()))?;
        atomic_io::replace(&self.dir, self.file_name.as_str(), &json)
            .map_err(|err| write_error(err.to_string()))
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StoreError> {
        let _held = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        // A corrupt file is replaced rather than blocking every write.
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        if change(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _held = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
