//! In-memory Repository
//!
//! Document map living in the page. Backs local-only mode when no Firebase
//! project is configured, and lets tests inject write failures.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use super::document::TodoDocument;
use super::traits::{Snapshot, Subscription, SnapshotCallback, TodoRepository};
use crate::board::{Board, Placement};
use crate::error::{TodoError, TodoResult};
use crate::models::{Todo, TodoId, TodosStatus};

#[derive(Default)]
struct Inner {
    documents: BTreeMap<TodoId, TodoDocument>,
    subscribers: Vec<(u64, Rc<dyn Fn(Snapshot)>)>,
    next_subscriber: u64,
    fail_next: u32,
    fail_always: bool,
    write_attempts: usize,
}

/// Shared handle; clones see the same documents
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with every item of `board`
    pub fn seeded(board: &Board) -> Self {
        let repo = Self::new();
        {
            let mut inner = repo.inner.borrow_mut();
            for zone in TodosStatus::ALL {
                for (index, todo) in board.list(zone).iter().enumerate() {
                    inner
                        .documents
                        .insert(todo.id.clone(), TodoDocument::from_todo(todo, index as u32));
                }
            }
        }
        repo
    }

    /// Fail the next `count` writes
    pub fn fail_next(&self, count: u32) {
        self.inner.borrow_mut().fail_next = count;
    }

    /// Fail every write until turned off
    pub fn fail_always(&self, fail: bool) {
        self.inner.borrow_mut().fail_always = fail;
    }

    /// Writes attempted so far, failed ones included
    pub fn write_attempts(&self) -> usize {
        self.inner.borrow().write_attempts
    }

    pub fn document(&self, id: &TodoId) -> Option<TodoDocument> {
        self.inner.borrow().documents.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `todo` the way older clients did, without a position
    #[cfg(test)]
    pub(crate) fn insert_unpositioned(&self, todo: &Todo) {
        let mut document = TodoDocument::from_todo(todo, 0);
        document.position = None;
        self.inner.borrow_mut().documents.insert(todo.id.clone(), document);
    }

    fn begin_write(&self) -> TodoResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.write_attempts += 1;
        if inner.fail_always {
            return Err(TodoError::Remote("unavailable".to_string()));
        }
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            return Err(TodoError::Remote("unavailable".to_string()));
        }
        Ok(())
    }

    fn snapshot(inner: &Inner) -> Snapshot {
        inner
            .documents
            .iter()
            .map(|(id, doc)| doc.clone().into_todo(id.clone()))
            .collect()
    }

    // Callbacks run after the borrow is released so they may read the repository
    fn notify(&self) {
        let (snapshot, subscribers) = {
            let inner = self.inner.borrow();
            let subscribers: Vec<_> = inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect();
            (Self::snapshot(&inner), subscribers)
        };
        for callback in subscribers {
            callback(snapshot.clone());
        }
    }
}

#[async_trait(?Send)]
impl TodoRepository for MemoryRepository {
    async fn add(&self, todo: &Todo, position: u32) -> TodoResult<()> {
        self.begin_write()?;
        self.inner
            .borrow_mut()
            .documents
            .insert(todo.id.clone(), TodoDocument::from_todo(todo, position));
        self.notify();
        Ok(())
    }

    async fn rename(&self, id: &TodoId, name: &str) -> TodoResult<()> {
        self.begin_write()?;
        {
            let mut inner = self.inner.borrow_mut();
            let doc = inner
                .documents
                .get_mut(id)
                .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
            doc.name = name.to_string();
        }
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> TodoResult<()> {
        self.begin_write()?;
        self.inner.borrow_mut().documents.remove(id);
        self.notify();
        Ok(())
    }

    async fn save_placements(&self, placements: &[Placement]) -> TodoResult<()> {
        self.begin_write()?;
        {
            let mut inner = self.inner.borrow_mut();
            // All-or-nothing, like a batched write
            if let Some(missing) = placements.iter().find(|p| !inner.documents.contains_key(&p.id)) {
                return Err(TodoError::NotFound(missing.id.to_string()));
            }
            for placement in placements {
                if let Some(doc) = inner.documents.get_mut(&placement.id) {
                    doc.apply_placement(placement);
                }
            }
        }
        self.notify();
        Ok(())
    }

    fn subscribe(&self, on_snapshot: SnapshotCallback) -> TodoResult<Subscription> {
        let callback: Rc<dyn Fn(Snapshot)> = Rc::from(on_snapshot);
        let (id, initial) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner.subscribers.push((id, callback.clone()));
            (id, Self::snapshot(&inner))
        };
        callback(initial);

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
            }
        }))
    }
}
