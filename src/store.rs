//! Board State Store
//!
//! Uses Leptos reactive_stores so each column re-renders only when its own
//! list changes.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::board::Board;
use crate::models::{Todo, TodosStatus, TodosView};

/// Rendered board state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    pub backlog: Vec<Todo>,
    pub active: Vec<Todo>,
    pub completed: Vec<Todo>,
    pub view: TodosView,
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

// ========================
// Store Helper Functions
// ========================

/// Publish a board, touching only the columns that changed
pub fn store_set_board(store: &BoardStore, board: Board) {
    let Board { backlog, active, completed } = board;
    if store.backlog().with_untracked(|current| *current != backlog) {
        *store.backlog().write() = backlog;
    }
    if store.active().with_untracked(|current| *current != active) {
        *store.active().write() = active;
    }
    if store.completed().with_untracked(|current| *current != completed) {
        *store.completed().write() = completed;
    }
}

/// Tracked read of one column
pub fn store_list(store: &BoardStore, zone: TodosStatus) -> Vec<Todo> {
    match zone {
        TodosStatus::BacklogTodos => store.backlog().get(),
        TodosStatus::ActiveTodos => store.active().get(),
        TodosStatus::CompletedTodos => store.completed().get(),
    }
}

/// Untracked length of one column
pub fn store_list_len(store: &BoardStore, zone: TodosStatus) -> usize {
    match zone {
        TodosStatus::BacklogTodos => store.backlog().with_untracked(Vec::len),
        TodosStatus::ActiveTodos => store.active().with_untracked(Vec::len),
        TodosStatus::CompletedTodos => store.completed().with_untracked(Vec::len),
    }
}

/// Tracked item count across all columns
pub fn store_total(store: &BoardStore) -> usize {
    store.backlog().with(Vec::len) + store.active().with(Vec::len) + store.completed().with(Vec::len)
}
