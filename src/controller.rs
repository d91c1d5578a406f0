//! Board Controller
//!
//! Owns the current board and its local-storage mirror. Every user action
//! goes through here: the board is replaced by a new value, mirrored, and
//! the matching remote write is handed back to the caller to dispatch.

use log::{debug, warn};

use crate::board::{Board, DropResult};
use crate::models::{Todo, TodoId, TodosStatus};
use crate::repository::Snapshot;
use crate::storage::{load_board, save_board, KeyValueStore};
use crate::sync::WriteIntent;

pub struct BoardController<S: KeyValueStore> {
    board: Board,
    storage: S,
}

impl<S: KeyValueStore> BoardController<S> {
    /// Start from whatever the local mirror holds
    pub fn new(storage: S) -> Self {
        let board = load_board(&storage);
        debug!("[BOARD] Loaded {} todos from local storage", board.len());
        Self { board, storage }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, next: Board) {
        self.board = next;
        if let Err(e) = save_board(&self.storage, &self.board) {
            warn!("[STORAGE] Mirror not updated: {}", e);
        }
    }

    /// Append a backlog item named `name` (trimmed). Blank names are ignored.
    pub fn add_item(&mut self, name: &str) -> Option<WriteIntent> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let position = self.board.backlog.len() as u32;
        let todo = Todo::new(TodoId::generate(), name).placed_in(TodosStatus::BacklogTodos);
        debug!("[BOARD] Add {} \"{}\"", todo.id, todo.name);
        self.commit(self.board.add(todo.clone()));
        // Older items of the column may carry stale or missing positions
        let placements = self
            .board
            .placements_of(&[TodosStatus::BacklogTodos])
            .into_iter()
            .filter(|p| p.id != todo.id)
            .collect();
        Some(WriteIntent::Add { todo, position, placements })
    }

    /// Apply a finished drag; `None` when nothing moved
    pub fn drag_end(&mut self, result: &DropResult<TodosStatus>) -> Option<WriteIntent> {
        let next = self.board.drag_end(result)?;
        let id = self.board.list(result.source.zone)[result.source.index].id.clone();
        let mut zones = vec![result.source.zone];
        zones.extend(result.destination.map(|d| d.zone));
        let placements = next.placements_of(&zones);
        debug!("[BOARD] Move {} {:?} -> {:?}", id, result.source, result.destination);
        self.commit(next);
        Some(WriteIntent::Move {
            id,
            from: result.source,
            placements,
        })
    }

    /// Rename to the trimmed `name`; blank or unchanged names do nothing
    pub fn rename(&mut self, id: &TodoId, name: &str) -> Option<WriteIntent> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let previous = self.board.get(id)?.name.clone();
        let next = self.board.rename(id, name)?;
        self.commit(next);
        Some(WriteIntent::Rename {
            id: id.clone(),
            previous,
            name: name.to_string(),
        })
    }

    pub fn delete(&mut self, id: &TodoId) -> Option<WriteIntent> {
        let (next, todo, location) = self.board.remove(id)?;
        debug!("[BOARD] Delete {}", id);
        let placements = next.placements_of(&[location.zone]);
        self.commit(next);
        Some(WriteIntent::Delete { todo, location, placements })
    }

    /// Mark done (move to the end of Done) or reopen (move to the end of the backlog)
    pub fn toggle_done(&mut self, id: &TodoId) -> Option<WriteIntent> {
        let (source, destination) = self.board.toggle_done_move(id)?;
        self.drag_end(&DropResult {
            source,
            destination: Some(destination),
        })
    }

    /// Replace the board with a remote snapshot. Returns whether anything changed.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        let next = Board::from_documents(snapshot);
        if next == self.board {
            return false;
        }
        debug!("[BOARD] Snapshot with {} todos", next.len());
        self.commit(next);
        true
    }

    /// Undo a failed remote write. Returns whether the board changed.
    pub fn rollback(&mut self, intent: &WriteIntent) -> bool {
        match intent.rollback(&self.board) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Location;
    use crate::models::Status;
    use crate::repository::{MemoryRepository, TodoRepository};
    use crate::storage::MemoryStorage;
    use crate::sync::{dispatch, SyncPolicy};

    fn controller() -> BoardController<MemoryStorage> {
        BoardController::new(MemoryStorage::new())
    }

    fn drop_result(from: Location, to: Option<Location>) -> DropResult<TodosStatus> {
        DropResult { source: from, destination: to }
    }

    fn loc(zone: TodosStatus, index: usize) -> Location {
        Location::new(zone, index)
    }

    async fn send(repo: &MemoryRepository, intent: &WriteIntent) {
        dispatch(repo, intent, &SyncPolicy::default(), |_| std::future::ready(()))
            .await
            .unwrap();
    }

    /// Current contents of the remote collection
    fn remote_snapshot(repo: &MemoryRepository) -> Snapshot {
        let received = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = received.clone();
        let _subscription = repo
            .subscribe(Box::new(move |snapshot| *sink.borrow_mut() = snapshot))
            .unwrap();
        received.take()
    }

    /// Board as a fresh page would build it from the remote collection
    fn remote_board(repo: &MemoryRepository) -> Board {
        Board::from_documents(remote_snapshot(repo))
    }

    fn names(list: &[Todo]) -> Vec<&str> {
        list.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_add_item() {
        let mut c = controller();
        let intent = c.add_item("  Buy milk ").unwrap();

        assert_eq!(c.board().backlog.len(), 1);
        let todo = &c.board().backlog[0];
        assert_eq!(todo.name, "Buy milk");
        assert_eq!(todo.status, Status::Backlog);
        assert!(!todo.is_done);
        assert!(matches!(intent, WriteIntent::Add { position: 0, .. }));
        assert_eq!(c.storage().writes(), 3);
    }

    #[test]
    fn test_blank_name_ignored() {
        let mut c = controller();
        assert!(c.add_item("   ").is_none());
        assert!(c.board().is_empty());
        assert_eq!(c.storage().writes(), 0);
    }

    #[test]
    fn test_noop_drag_writes_nothing() {
        let mut c = controller();
        c.add_item("a");
        let writes = c.storage().writes();
        let before = c.board().clone();

        let same = loc(TodosStatus::BacklogTodos, 0);
        assert!(c.drag_end(&drop_result(same, Some(same))).is_none());
        assert!(c.drag_end(&drop_result(same, None)).is_none());

        assert_eq!(c.board(), &before);
        assert_eq!(c.storage().writes(), writes);
    }

    #[test]
    fn test_rename_blank_or_same_does_nothing() {
        let mut c = controller();
        c.add_item("a");
        let id = c.board().backlog[0].id.clone();
        assert!(c.rename(&id, " ").is_none());
        assert!(c.rename(&id, "a").is_none());
        assert_eq!(c.board().backlog[0].name, "a");
    }

    #[test]
    fn test_delete_removes_from_every_list() {
        let mut c = controller();
        c.add_item("a");
        c.add_item("b");
        let id = c.board().backlog[0].id.clone();
        c.drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 0), Some(loc(TodosStatus::ActiveTodos, 0))));

        assert!(c.delete(&id).is_some());
        assert!(c.board().locate(&id).is_none());
        assert_eq!(c.board().len(), 1);
        assert!(c.delete(&id).is_none());
    }

    #[test]
    fn test_toggle_done_moves_and_reopens() {
        let mut c = controller();
        c.add_item("a");
        let id = c.board().backlog[0].id.clone();

        let intent = c.toggle_done(&id).unwrap();
        assert!(matches!(intent, WriteIntent::Move { .. }));
        assert_eq!(c.board().completed[0].id, id);
        assert!(c.board().completed[0].is_done);

        c.toggle_done(&id).unwrap();
        assert_eq!(c.board().backlog[0].id, id);
        assert_eq!(c.board().backlog[0].status, Status::Backlog);
    }

    #[test]
    fn test_board_survives_reload() {
        let storage = MemoryStorage::new();
        let mut c = BoardController::new(storage);
        c.add_item("a");
        c.add_item("b");
        c.drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 1), Some(loc(TodosStatus::CompletedTodos, 0))));
        let board = c.board().clone();

        let reloaded = BoardController::new(c.storage);
        assert_eq!(reloaded.board(), &board);
    }

    #[test]
    fn test_storage_failure_keeps_state() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        let mut c = BoardController::new(storage);
        assert!(c.add_item("a").is_some());
        assert_eq!(c.board().backlog.len(), 1);
    }

    #[test]
    fn test_snapshot_partitions_remote_documents() {
        let mut c = controller();
        let snapshot = vec![
            (Todo::new(TodoId::new("1"), "a").placed_in(TodosStatus::ActiveTodos), Some(0)),
            (Todo::new(TodoId::new("2"), "b").placed_in(TodosStatus::CompletedTodos), Some(0)),
            (Todo::new(TodoId::new("3"), "c"), Some(0)),
        ];
        assert!(c.apply_snapshot(snapshot.clone()));
        assert_eq!(c.board().active[0].name, "a");
        assert_eq!(c.board().completed[0].name, "b");
        assert_eq!(c.board().backlog[0].name, "c");

        let writes = c.storage().writes();
        assert!(!c.apply_snapshot(snapshot));
        assert_eq!(c.storage().writes(), writes);
    }

    #[tokio::test]
    async fn test_failed_add_rolls_back() {
        let repo = MemoryRepository::new();
        repo.fail_always(true);
        let mut c = controller();

        let intent = c.add_item("Buy milk").unwrap();
        let policy = SyncPolicy { max_attempts: 2, ..SyncPolicy::default() };
        let failure = dispatch(&repo, &intent, &policy, |_| std::future::ready(()))
            .await
            .unwrap_err();

        assert!(c.rollback(&failure.intent));
        assert!(c.board().is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_buy_milk_scenario() {
        let repo = MemoryRepository::new();
        let mut c = controller();

        // Add
        let intent = c.add_item("Buy milk").unwrap();
        send(&repo, &intent).await;
        assert_eq!(c.board().backlog.len(), 1);
        assert_eq!(c.board().backlog[0].name, "Buy milk");
        assert_eq!(c.board().backlog[0].status, Status::Backlog);
        assert!(!c.board().backlog[0].is_done);
        let id = c.board().backlog[0].id.clone();

        // Drag backlog[0] -> active[0]
        let intent = c
            .drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 0), Some(loc(TodosStatus::ActiveTodos, 0))))
            .unwrap();
        send(&repo, &intent).await;
        assert!(c.board().backlog.is_empty());
        assert_eq!(c.board().active[0].name, "Buy milk");
        let mirrored = load_board(c.storage());
        assert!(mirrored.backlog.is_empty());
        assert_eq!(mirrored.active[0].id, id);
        assert_eq!(repo.document(&id).unwrap().status, Status::Active);

        // Rename
        let intent = c.rename(&id, "Buy oat milk").unwrap();
        send(&repo, &intent).await;
        assert_eq!(c.board().active[0].name, "Buy oat milk");
        assert_eq!(repo.document(&id).unwrap().name, "Buy oat milk");

        // Delete
        let intent = c.delete(&id).unwrap();
        send(&repo, &intent).await;
        assert!(c.board().active.is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_remote_snapshot_round_trip() {
        let repo = MemoryRepository::new();
        let mut c = controller();
        c.add_item("a");
        c.add_item("b");
        for (index, todo) in c.board().backlog.clone().iter().enumerate() {
            repo.add(todo, index as u32).await.unwrap();
        }
        let intent = c
            .drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 1), Some(loc(TodosStatus::BacklogTodos, 0))))
            .unwrap();
        send(&repo, &intent).await;

        // A fresh page built only from the remote collection sees the same order
        let mut fresh = controller();
        fresh.apply_snapshot(remote_snapshot(&repo));
        assert_eq!(fresh.board(), c.board());
    }

    #[tokio::test]
    async fn test_remote_order_after_delete_then_move() {
        let repo = MemoryRepository::new();
        let mut c = controller();

        let intent = c.add_item("x").unwrap();
        send(&repo, &intent).await;
        let intent = c
            .drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 0), Some(loc(TodosStatus::ActiveTodos, 0))))
            .unwrap();
        send(&repo, &intent).await;
        for name in ["a", "b", "c"] {
            let intent = c.add_item(name).unwrap();
            send(&repo, &intent).await;
        }

        let a = c.board().backlog[0].id.clone();
        let intent = c.delete(&a).unwrap();
        send(&repo, &intent).await;
        let intent = c
            .drag_end(&drop_result(loc(TodosStatus::ActiveTodos, 0), Some(loc(TodosStatus::BacklogTodos, 2))))
            .unwrap();
        send(&repo, &intent).await;

        assert_eq!(names(&c.board().backlog), vec!["b", "c", "x"]);
        assert_eq!(&remote_board(&repo), c.board());
    }

    #[tokio::test]
    async fn test_move_among_unpositioned_documents() {
        let repo = MemoryRepository::new();
        for (id, name) in [("1", "one"), ("2", "two"), ("3", "three")] {
            repo.insert_unpositioned(&Todo::new(TodoId::new(id), name));
        }
        let mut c = controller();
        assert!(c.apply_snapshot(remote_snapshot(&repo)));
        assert_eq!(names(&c.board().backlog), vec!["one", "two", "three"]);

        let intent = c
            .drag_end(&drop_result(loc(TodosStatus::BacklogTodos, 0), Some(loc(TodosStatus::BacklogTodos, 2))))
            .unwrap();
        send(&repo, &intent).await;

        assert_eq!(names(&c.board().backlog), vec!["two", "three", "one"]);
        assert_eq!(&remote_board(&repo), c.board());
    }

    #[tokio::test]
    async fn test_add_after_unpositioned_documents() {
        let repo = MemoryRepository::new();
        repo.insert_unpositioned(&Todo::new(TodoId::new("1"), "one"));
        repo.insert_unpositioned(&Todo::new(TodoId::new("2"), "two"));
        let mut c = controller();
        assert!(c.apply_snapshot(remote_snapshot(&repo)));

        let intent = c.add_item("three").unwrap();
        send(&repo, &intent).await;

        assert_eq!(names(&c.board().backlog), vec!["one", "two", "three"]);
        assert_eq!(&remote_board(&repo), c.board());
    }
}
