//! Board Operations
//!
//! The three column lists and every edit applied to them. Each operation
//! returns a new `Board`; the previous value is never touched, so a stale
//! copy held by an older callback can't be corrupted by a newer one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Status, Todo, TodoId, TodosStatus};

pub use leptos_dragdrop::{DragLocation, DropResult};

/// A position on the board
pub type Location = DragLocation<TodosStatus>;

/// Where one item sits, as persisted remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: TodoId,
    pub status: Status,
    pub position: u32,
    pub is_done: bool,
}

/// The three column lists. They partition the items: every id is in exactly one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub backlog: Vec<Todo>,
    pub active: Vec<Todo>,
    pub completed: Vec<Todo>,
}

impl Board {
    pub fn list(&self, zone: TodosStatus) -> &[Todo] {
        match zone {
            TodosStatus::BacklogTodos => &self.backlog,
            TodosStatus::ActiveTodos => &self.active,
            TodosStatus::CompletedTodos => &self.completed,
        }
    }

    fn list_mut(&mut self, zone: TodosStatus) -> &mut Vec<Todo> {
        match zone {
            TodosStatus::BacklogTodos => &mut self.backlog,
            TodosStatus::ActiveTodos => &mut self.active,
            TodosStatus::CompletedTodos => &mut self.completed,
        }
    }

    /// Total number of items across all columns
    pub fn len(&self) -> usize {
        self.backlog.len() + self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn locate(&self, id: &TodoId) -> Option<Location> {
        TodosStatus::ALL.into_iter().find_map(|zone| {
            self.list(zone)
                .iter()
                .position(|todo| &todo.id == id)
                .map(|index| Location::new(zone, index))
        })
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.locate(id).map(|loc| &self.list(loc.zone)[loc.index])
    }

    /// Board with `zone` replaced by `todos`, each normalized to that column
    pub fn with_list(&self, zone: TodosStatus, todos: Vec<Todo>) -> Board {
        let mut next = self.clone();
        *next.list_mut(zone) = todos.into_iter().map(|todo| todo.placed_in(zone)).collect();
        next
    }

    /// Append a new item to the backlog
    pub fn add(&self, todo: Todo) -> Board {
        let mut next = self.clone();
        next.backlog.push(todo.placed_in(TodosStatus::BacklogTodos));
        next
    }

    /// Insert at `location`, clamping the index to the list length
    pub fn insert_at(&self, todo: Todo, location: Location) -> Board {
        let mut next = self.clone();
        let list = next.list_mut(location.zone);
        let at = location.index.min(list.len());
        list.insert(at, todo.placed_in(location.zone));
        next
    }

    /// Move the item at `source` to `destination` (final index after removal).
    ///
    /// Returns `None` when nothing would change: identical locations or a
    /// source index past the end of its list.
    pub fn move_todo(&self, source: Location, destination: Location) -> Option<Board> {
        if source == destination || source.index >= self.list(source.zone).len() {
            return None;
        }

        let mut next = self.clone();
        let todo = next.list_mut(source.zone).remove(source.index);
        let list = next.list_mut(destination.zone);
        let at = destination.index.min(list.len());
        list.insert(at, todo.placed_in(destination.zone));
        Some(next)
    }

    /// Apply a finished drag. A cancelled drag (no destination) is a no-op.
    pub fn drag_end(&self, result: &DropResult<TodosStatus>) -> Option<Board> {
        let destination = result.destination?;
        self.move_todo(result.source, destination)
    }

    /// Rename by id; `None` if the id is unknown or the name is unchanged
    pub fn rename(&self, id: &TodoId, name: &str) -> Option<Board> {
        let loc = self.locate(id)?;
        if self.list(loc.zone)[loc.index].name == name {
            return None;
        }
        let mut next = self.clone();
        next.list_mut(loc.zone)[loc.index].name = name.to_string();
        Some(next)
    }

    /// Remove by id, returning the new board, the removed item and where it was
    pub fn remove(&self, id: &TodoId) -> Option<(Board, Todo, Location)> {
        let loc = self.locate(id)?;
        let mut next = self.clone();
        let todo = next.list_mut(loc.zone).remove(loc.index);
        Some((next, todo, loc))
    }

    /// Source and destination for toggling done: an open item goes to the
    /// end of Done, a done item is reopened at the end of the backlog.
    pub fn toggle_done_move(&self, id: &TodoId) -> Option<(Location, Location)> {
        let source = self.locate(id)?;
        let target = match source.zone {
            TodosStatus::CompletedTodos => TodosStatus::BacklogTodos,
            _ => TodosStatus::CompletedTodos,
        };
        Some((source, Location::new(target, self.list(target).len())))
    }

    /// Build a board from remote documents, grouped by status and ordered
    /// by position. Documents without a position sort last, then by id.
    pub fn from_documents(documents: Vec<(Todo, Option<u32>)>) -> Board {
        let mut grouped: HashMap<TodosStatus, Vec<(Todo, Option<u32>)>> = HashMap::new();
        for (todo, position) in documents {
            grouped.entry(todo.status.zone()).or_default().push((todo, position));
        }

        let mut board = Board::default();
        for zone in TodosStatus::ALL {
            let mut docs = grouped.remove(&zone).unwrap_or_default();
            docs.sort_by(|(a, pa), (b, pb)| {
                pa.unwrap_or(u32::MAX)
                    .cmp(&pb.unwrap_or(u32::MAX))
                    .then_with(|| a.id.cmp(&b.id))
            });
            board = board.with_list(zone, docs.into_iter().map(|(todo, _)| todo).collect());
        }
        board
    }

    fn column_placements(&self, zone: TodosStatus) -> Vec<Placement> {
        self.list(zone)
            .iter()
            .enumerate()
            .map(|(index, todo)| Placement {
                id: todo.id.clone(),
                status: zone.status(),
                position: index as u32,
                is_done: zone == TodosStatus::CompletedTodos,
            })
            .collect()
    }

    /// Placement of every item in the given columns, numbered densely from 0.
    /// Stored positions may have gaps or be missing, so whole columns are rewritten.
    pub fn placements_of(&self, zones: &[TodosStatus]) -> Vec<Placement> {
        let mut placements = Vec::new();
        for (i, zone) in zones.iter().enumerate() {
            if !zones[..i].contains(zone) {
                placements.extend(self.column_placements(*zone));
            }
        }
        placements
    }
}

/// Whether an item may switch to inline editing
pub fn can_begin_edit(todo: &Todo, editing: bool) -> bool {
    todo.status != Status::Done && !editing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str) -> Todo {
        Todo::new(TodoId::new(id), format!("Todo {}", id))
    }

    fn ids(list: &[Todo]) -> Vec<&str> {
        list.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Board {
        Board::default()
            .with_list(TodosStatus::BacklogTodos, vec![todo("a"), todo("b"), todo("c")])
            .with_list(TodosStatus::ActiveTodos, vec![todo("d")])
            .with_list(TodosStatus::CompletedTodos, vec![todo("e"), todo("f")])
    }

    fn loc(zone: TodosStatus, index: usize) -> Location {
        Location::new(zone, index)
    }

    #[test]
    fn test_add_appends_to_backlog() {
        let board = sample();
        let next = board.add(Todo::new(TodoId::new("z"), "New"));

        assert_eq!(next.backlog.len(), board.backlog.len() + 1);
        let added = next.backlog.last().unwrap();
        assert_eq!(added.status, Status::Backlog);
        assert!(!added.is_done);
        // Previous value untouched
        assert_eq!(board.backlog.len(), 3);
    }

    #[test]
    fn test_move_between_columns() {
        let next = sample()
            .move_todo(loc(TodosStatus::BacklogTodos, 1), loc(TodosStatus::ActiveTodos, 0))
            .unwrap();

        assert_eq!(ids(&next.backlog), vec!["a", "c"]);
        assert_eq!(ids(&next.active), vec!["b", "d"]);
        assert_eq!(next.active[0].status, Status::Active);
    }

    #[test]
    fn test_move_into_done_sets_flag() {
        let next = sample()
            .move_todo(loc(TodosStatus::ActiveTodos, 0), loc(TodosStatus::CompletedTodos, 2))
            .unwrap();

        assert_eq!(ids(&next.completed), vec!["e", "f", "d"]);
        assert!(next.completed[2].is_done);
        assert_eq!(next.completed[2].status, Status::Done);
    }

    #[test]
    fn test_reorder_within_column() {
        let next = sample()
            .move_todo(loc(TodosStatus::BacklogTodos, 0), loc(TodosStatus::BacklogTodos, 2))
            .unwrap();
        assert_eq!(ids(&next.backlog), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_destination_index_clamped() {
        let next = sample()
            .move_todo(loc(TodosStatus::BacklogTodos, 0), loc(TodosStatus::ActiveTodos, 99))
            .unwrap();
        assert_eq!(ids(&next.active), vec!["d", "a"]);
    }

    #[test]
    fn test_same_location_is_noop() {
        let board = sample();
        let result = DropResult {
            source: loc(TodosStatus::ActiveTodos, 0),
            destination: Some(loc(TodosStatus::ActiveTodos, 0)),
        };
        assert!(board.drag_end(&result).is_none());
    }

    #[test]
    fn test_cancelled_drag_is_noop() {
        let result = DropResult {
            source: loc(TodosStatus::BacklogTodos, 0),
            destination: None,
        };
        assert!(sample().drag_end(&result).is_none());
    }

    #[test]
    fn test_bad_source_index_is_noop() {
        assert!(sample()
            .move_todo(loc(TodosStatus::ActiveTodos, 5), loc(TodosStatus::BacklogTodos, 0))
            .is_none());
    }

    #[test]
    fn test_moves_preserve_item_count() {
        let board = sample();
        for src_zone in TodosStatus::ALL {
            for src_index in 0..board.list(src_zone).len() {
                for dst_zone in TodosStatus::ALL {
                    for dst_index in 0..=board.list(dst_zone).len() + 1 {
                        let source = loc(src_zone, src_index);
                        let destination = loc(dst_zone, dst_index);
                        if let Some(next) = board.move_todo(source, destination) {
                            assert_eq!(next.len(), board.len());
                            let mut all: Vec<_> = next.placements_of(&TodosStatus::ALL).into_iter().map(|p| p.id).collect();
                            all.sort();
                            all.dedup();
                            assert_eq!(all.len(), board.len());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rename() {
        let board = sample();
        let next = board.rename(&TodoId::new("d"), "Renamed").unwrap();
        assert_eq!(next.active[0].name, "Renamed");
        assert!(next.rename(&TodoId::new("d"), "Renamed").is_none());
        assert!(board.rename(&TodoId::new("missing"), "x").is_none());
    }

    #[test]
    fn test_remove() {
        let (next, removed, at) = sample().remove(&TodoId::new("f")).unwrap();
        assert_eq!(removed.id.as_str(), "f");
        assert_eq!(at, loc(TodosStatus::CompletedTodos, 1));
        assert!(next.locate(&TodoId::new("f")).is_none());
        assert_eq!(next.len(), 5);
    }

    #[test]
    fn test_toggle_done_targets() {
        let board = sample();
        let (from, to) = board.toggle_done_move(&TodoId::new("a")).unwrap();
        assert_eq!(from, loc(TodosStatus::BacklogTodos, 0));
        assert_eq!(to, loc(TodosStatus::CompletedTodos, 2));

        let (from, to) = board.toggle_done_move(&TodoId::new("e")).unwrap();
        assert_eq!(from, loc(TodosStatus::CompletedTodos, 0));
        assert_eq!(to, loc(TodosStatus::BacklogTodos, 3));
    }

    #[test]
    fn test_from_documents_partitions_and_orders() {
        let docs = vec![
            (todo("x").placed_in(TodosStatus::ActiveTodos), Some(1)),
            (todo("y").placed_in(TodosStatus::ActiveTodos), Some(0)),
            (todo("z"), None),
            (todo("w"), Some(0)),
            (todo("v").placed_in(TodosStatus::CompletedTodos), None),
        ];
        let board = Board::from_documents(docs);

        assert_eq!(ids(&board.backlog), vec!["w", "z"]);
        assert_eq!(ids(&board.active), vec!["y", "x"]);
        assert_eq!(ids(&board.completed), vec!["v"]);
        assert!(board.completed[0].is_done);
    }

    #[test]
    fn test_placements_cover_affected_columns() {
        let board = sample();
        let next = board
            .move_todo(loc(TodosStatus::BacklogTodos, 0), loc(TodosStatus::ActiveTodos, 0))
            .unwrap();
        let placements = next.placements_of(&[TodosStatus::BacklogTodos, TodosStatus::ActiveTodos]);
        let written: Vec<_> = placements.iter().map(|p| (p.id.as_str(), p.status, p.position)).collect();

        assert_eq!(
            written,
            vec![
                ("b", Status::Backlog, 0),
                ("c", Status::Backlog, 1),
                ("a", Status::Active, 0),
                ("d", Status::Active, 1),
            ]
        );
    }

    #[test]
    fn test_placements_same_column_once() {
        let board = sample();
        let placements = board.placements_of(&[TodosStatus::CompletedTodos, TodosStatus::CompletedTodos]);
        assert_eq!(placements.len(), 2);
        assert!(placements.iter().all(|p| p.is_done));
    }

    #[test]
    fn test_board_rebuilt_from_placements_matches() {
        let board = sample()
            .move_todo(loc(TodosStatus::CompletedTodos, 1), loc(TodosStatus::BacklogTodos, 1))
            .unwrap();
        let documents = board
            .placements_of(&TodosStatus::ALL)
            .into_iter()
            .map(|p| {
                let todo = board.get(&p.id).unwrap().clone();
                (todo, Some(p.position))
            })
            .collect();
        assert_eq!(Board::from_documents(documents), board);
    }

    #[test]
    fn test_can_begin_edit() {
        let open = todo("a");
        assert!(can_begin_edit(&open, false));
        assert!(!can_begin_edit(&open, true));
        let done = todo("b").placed_in(TodosStatus::CompletedTodos);
        assert!(!can_begin_edit(&done, false));
    }
}
