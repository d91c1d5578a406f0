//! Repository Layer
//!
//! Access to the remote `todos` collection behind one trait, so the page
//! gets its database handle injected instead of importing a global.

mod document;
mod firestore;
mod memory;
mod traits;

pub use firestore::{FirebaseConfig, FirestoreRepository};
pub use memory::MemoryRepository;
pub use traits::{Snapshot, SnapshotCallback, Subscription, TodoRepository};
