//! Local persistence.
//!
//! A durable string key/value store scoped to one local session. Backends
//! only move strings; JSON encoding and the corrupt-value fallback live in
//! [`save`] and [`load`] so every backend behaves the same way.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Keys under which session snapshots are persisted.
pub mod keys {
    /// Cart snapshot.
    pub const CART: &str = "forecourt_cart";

    /// Car catalog.
    pub const CARS: &str = "forecourt_cars";

    /// Demo user set.
    pub const USERS: &str = "forecourt_users";

    /// Append-only discount log.
    pub const DISCOUNTS_LOG: &str = "forecourt_discounts_log";

    /// Site settings.
    pub const SETTINGS: &str = "forecourt_settings";

    /// Currently signed-in user.
    pub const CURRENT_USER: &str = "forecourt_current_user";
}

/// Errors raised by a [`Store`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value could not be serialized for storage.
    #[error("failed to serialize value for key {key}")]
    Serialize {
        /// Key the value was meant to be stored under.
        key: String,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// The backend failed to read or write.
    #[error("storage backend failed for key {key}")]
    Backend {
        /// Key the operation targeted.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backing directory could not be created.
    #[error("failed to create store directory {}", dir.display())]
    CreateDir {
        /// Directory the store was asked to open.
        dir: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A durable string key/value store.
pub trait Store: fmt::Debug {
    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot persist the value.
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read at all; an absent
    /// key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Delete the value under `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot delete the value.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Serialize `value` as JSON and write it through to the store.
///
/// # Errors
///
/// Returns an error when serialization or the backend write fails.
pub fn save<T>(store: &dyn Store, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_owned(),
        source,
    })?;

    store.put(key, json)
}

/// Load and decode the value under `key`, falling back to `default`.
///
/// Absent keys, unreadable backends and malformed payloads all yield the
/// default. A malformed payload is logged and swallowed, never surfaced as
/// an error.
pub fn load<T: DeserializeOwned>(store: &dyn Store, key: &str, default: T) -> T {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "discarding corrupt snapshot");
                default
            }
        },
        Ok(None) => default,
        Err(error) => {
            tracing::warn!(key, %error, "store read failed, using default");
            default
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries().insert(key.to_owned(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// File-backed store keeping one JSON document per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            dir: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        fs::write(self.path(key), value).map_err(|source| StoreError::Backend {
            key: key.to_owned(),
            source,
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Backend {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Backend {
                key: key.to_owned(),
                source,
            }),
        }
    }
}
