//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for the remote to-do collection.
//! Implementations: Firestore (browser SDK) and in-memory.

use async_trait::async_trait;

use crate::board::Placement;
use crate::error::TodoResult;
use crate::models::{Todo, TodoId};

/// Every document of the collection with its stored position, in no particular order
pub type Snapshot = Vec<(Todo, Option<u32>)>;

/// Receives each snapshot of a live query
pub type SnapshotCallback = Box<dyn Fn(Snapshot)>;

/// Handle of a live query. Unsubscribes when dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

/// Remote collection of to-do documents keyed by item id.
///
/// Futures are `?Send`: everything runs on the browser's single thread.
#[async_trait(?Send)]
pub trait TodoRepository {
    /// Create the document for a new item
    async fn add(&self, todo: &Todo, position: u32) -> TodoResult<()>;

    /// Update the name field only
    async fn rename(&self, id: &TodoId, name: &str) -> TodoResult<()>;

    async fn delete(&self, id: &TodoId) -> TodoResult<()>;

    /// Write status, position and done flag of several items in one batch
    async fn save_placements(&self, placements: &[Placement]) -> TodoResult<()>;

    /// Live query over the whole collection. The callback fires once with
    /// the current contents and again after every change.
    fn subscribe(&self, on_snapshot: SnapshotCallback) -> TodoResult<Subscription>;
}
