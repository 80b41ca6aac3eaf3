//! Client-side persistent state for the task and board views.
//!
//! Every record collection is namespaced by the signed-in user's scope and
//! written back to `localStorage` after each mutation.

use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use tracing::warn;
use worksite_core::storage::{KeyValueStore, StorageError};
use worksite_core::{Board, TodoList, UserScope};

/// `window.localStorage` as a core key-value store.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }
}

/// A record collection that lives under a user scope.
pub trait ScopedRecord: Clone + 'static {
    fn load(store: &LocalStore, scope: &UserScope) -> Self;
    fn save(&self, store: &LocalStore, scope: &UserScope) -> Result<(), StorageError>;
}

impl ScopedRecord for TodoList {
    fn load(store: &LocalStore, scope: &UserScope) -> Self {
        TodoList::load(store, scope)
    }

    fn save(&self, store: &LocalStore, scope: &UserScope) -> Result<(), StorageError> {
        TodoList::save(self, store, scope)
    }
}

impl ScopedRecord for Board {
    fn load(store: &LocalStore, scope: &UserScope) -> Self {
        Board::load(store, scope)
    }

    fn save(&self, store: &LocalStore, scope: &UserScope) -> Result<(), StorageError> {
        Board::save(self, store, scope)
    }
}

/// Loads the collection for `scope` on first render (seeding defaults if
/// needed) and persists it on every update.
pub fn use_scoped<T: ScopedRecord>(scope: UserScope) -> UseScoped<T> {
    let state = use_signal(move || {
        let value = T::load(&LocalStore, &scope);
        ScopedEntry { scope, value }
    });
    UseScoped { inner: state }
}

struct ScopedEntry<T> {
    scope: UserScope,
    value: T,
}

pub struct UseScoped<T: 'static> {
    inner: Signal<ScopedEntry<T>>,
}

impl<T> Clone for UseScoped<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UseScoped<T> {}

impl<T: ScopedRecord> UseScoped<T> {
    /// Gets a cloned value snapshot.
    pub fn get(&self) -> T {
        self.inner.read().value.clone()
    }

    /// Replaces the stored value and persists.
    pub fn set(&mut self, value: T) {
        let mut inner = self.inner.write();
        inner.value = value;
        persist(&inner);
    }

    /// Applies a closure to mutate the value in-place and persists afterwards.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        let mut inner = self.inner.write();
        f(&mut inner.value);
        persist(&inner);
    }
}

fn persist<T: ScopedRecord>(entry: &ScopedEntry<T>) {
    if let Err(e) = entry.value.save(&LocalStore, &entry.scope) {
        warn!(scope = %entry.scope, error = %e, "Failed to persist to local storage");
    }
}
