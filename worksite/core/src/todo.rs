use crate::storage::{self, KeyValueStore, StorageError, UserScope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub task: String,
    pub completed: bool,
}

impl TodoItem {
    fn new(id: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            completed: false,
        }
    }
}

/// A user's to-do list, persisted as a JSON array under `todos-<scope>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self {
            items: vec![
                TodoItem::new("1", "✅ Check-in at front desk"),
                TodoItem::new("2", "📸 Complete facial authentication"),
                TodoItem::new("3", "🧰 Collect safety gear"),
                TodoItem::new("4", "📋 Review work assignments"),
            ],
        }
    }
}

impl TodoList {
    /// Loads the list for `scope`, seeding and persisting the default tasks
    /// when nothing usable is stored. An empty stored list counts as nothing.
    pub fn load(store: &impl KeyValueStore, scope: &UserScope) -> Self {
        storage::load_or_seed(
            store,
            &scope.todos_key(),
            |list: &TodoList| !list.items.is_empty(),
            TodoList::default,
        )
    }

    pub fn save(&self, store: &impl KeyValueStore, scope: &UserScope) -> Result<(), StorageError> {
        storage::save(store, &scope.todos_key(), self)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a task and returns its id. Blank input is ignored.
    pub fn add(&mut self, task: &str) -> Option<String> {
        if task.trim().is_empty() {
            return None;
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.items.push(TodoItem::new(id.clone(), task));
        Some(id)
    }

    /// Flips the completion flag. Returns false if no task has `id`.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    /// Removes the task. Returns false if no task has `id`.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }
}
