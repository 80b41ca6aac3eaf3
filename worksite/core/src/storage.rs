//! User-scoped persistence over a synchronous key-value store.
//!
//! Values are JSON documents. Reads are schema-validated: anything that does
//! not deserialize into the expected type is discarded and replaced with the
//! caller's defaults, which are written back immediately.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Failed to serialize value for key {key}: {message}")]
    Serialize { key: String, message: String },
    #[error("Storage rejected write for key {key}: {message}")]
    Write { key: String, message: String },
}

/// Synchronous string key-value store, e.g. browser `localStorage`.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Namespace of a single user, `<firstName>.<lastName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserScope(String);

impl UserScope {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self(format!("{first_name}.{last_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn todos_key(&self) -> String {
        format!("todos-{}", self.0)
    }

    pub fn issues_key(&self) -> String {
        format!("jira-issues-{}", self.0)
    }

    pub fn comments_key(&self) -> String {
        format!("jira-comments-{}", self.0)
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes `value` as JSON under `key`.
pub fn save<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set_raw(key, &json)
}

/// Loads the value under `key`, or seeds and persists `defaults()` when the
/// entry is absent, malformed, or rejected by `accept`.
pub fn load_or_seed<T, S, A, D>(store: &S, key: &str, accept: A, defaults: D) -> T
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
    A: FnOnce(&T) -> bool,
    D: FnOnce() -> T,
{
    if let Some(raw) = store.get_raw(key) {
        match serde_json::from_str::<T>(&raw) {
            Ok(value) if accept(&value) => return value,
            Ok(_) => debug!(key, "Stored value rejected, seeding defaults"),
            Err(e) => warn!(key, error = %e, "Malformed stored value, seeding defaults"),
        }
    }

    let value = defaults();
    if let Err(e) = save(store, key, &value) {
        warn!(key, error = %e, "Failed to persist seeded defaults");
    }
    value
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
