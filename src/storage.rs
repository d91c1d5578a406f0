//! Local Storage Mirror
//!
//! Each column is mirrored under its own key (`backlogTodos`, `activeTodos`,
//! `completedTodos`) as a JSON array of todos.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use log::warn;

use crate::board::Board;
use crate::error::{TodoError, TodoResult};
use crate::models::{Todo, TodosStatus};

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> TodoResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> TodoResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> TodoResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> TodoResult<()> {
        (**self).set_item(key, value)
    }
}

/// `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> TodoResult<Self> {
        let window = web_sys::window().ok_or_else(|| TodoError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| TodoError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| TodoError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> TodoResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| TodoError::Storage(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> TodoResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| TodoError::Storage(format!("{:?}", e)))
    }
}

/// In-process store, used when the browser has no usable localStorage
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_item` calls so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Make every following write fail, like a full quota
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> TodoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> TodoResult<()> {
        if self.fail_writes.get() {
            return Err(TodoError::Storage("quota exceeded".to_string()));
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

fn read_list(store: &impl KeyValueStore, zone: TodosStatus) -> TodoResult<Option<Vec<Todo>>> {
    match store.get_item(zone.storage_key())? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Read all three columns. A missing key leaves its column empty; an
/// unreadable or malformed one is skipped with a warning.
pub fn load_board(store: &impl KeyValueStore) -> Board {
    TodosStatus::ALL.into_iter().fold(Board::default(), |board, zone| {
        match read_list(store, zone) {
            Ok(Some(todos)) => board.with_list(zone, todos),
            Ok(None) => board,
            Err(e) => {
                warn!("[STORAGE] Skipping {}: {}", zone.storage_key(), e);
                board
            }
        }
    })
}

/// Write all three columns
pub fn save_board(store: &impl KeyValueStore, board: &Board) -> TodoResult<()> {
    for zone in TodosStatus::ALL {
        let raw = serde_json::to_string(board.list(zone))?;
        store.set_item(zone.storage_key(), &raw)?;
    }
    Ok(())
}
