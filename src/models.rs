//! Frontend Models
//!
//! The to-do record plus the enumerations naming its stage, its column
//! (drop zone) and the board view.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

thread_local! {
    static NEXT_SEQ: Cell<u32> = const { Cell::new(0) };
}

/// Identifier of a to-do, also the key of its remote document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh time-based id: `<unix millis>-<session sequence>`
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = NEXT_SEQ.with(|next| {
            let seq = next.get();
            next.set(seq.wrapping_add(1));
            seq
        });
        Self(format!("{}-{}", millis, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Older saved boards used numeric `Date.now()` ids
impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => TodoId(id),
            RawId::Number(id) => TodoId(id.to_string()),
        })
    }
}

/// Life-cycle stage of a to-do, derived from the column it sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Status {
    #[default]
    Backlog,
    Active,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Active => "Active",
            Status::Done => "Done",
        }
    }

    /// Column holding items of this stage
    pub fn zone(&self) -> TodosStatus {
        match self {
            Status::Backlog => TodosStatus::BacklogTodos,
            Status::Active => TodosStatus::ActiveTodos,
            Status::Done => TodosStatus::CompletedTodos,
        }
    }

    fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Status::Backlog),
            1 => Some(Status::Active),
            2 => Some(Status::Done),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Backlog" => Some(Status::Backlog),
            "Active" => Some(Status::Active),
            "Done" => Some(Status::Done),
            _ => None,
        }
    }
}

// Accepts the variant name or the legacy numeric enum value
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawStatus {
            Name(String),
            Index(u64),
        }

        let status = match RawStatus::deserialize(deserializer)? {
            RawStatus::Name(name) => Status::from_name(&name),
            RawStatus::Index(index) => Status::from_index(index),
        };
        status.ok_or_else(|| serde::de::Error::custom("unknown todo status"))
    }
}

/// Drop-zone identifiers, one per board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TodosStatus {
    BacklogTodos,
    ActiveTodos,
    CompletedTodos,
}

impl TodosStatus {
    /// Column order on the board
    pub const ALL: [TodosStatus; 3] = [
        TodosStatus::BacklogTodos,
        TodosStatus::ActiveTodos,
        TodosStatus::CompletedTodos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodosStatus::BacklogTodos => "BacklogTodos",
            TodosStatus::ActiveTodos => "ActiveTodos",
            TodosStatus::CompletedTodos => "CompletedTodos",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            TodosStatus::BacklogTodos => Status::Backlog,
            TodosStatus::ActiveTodos => Status::Active,
            TodosStatus::CompletedTodos => Status::Done,
        }
    }

    /// Column heading
    pub fn title(&self) -> &'static str {
        match self {
            TodosStatus::BacklogTodos => "To-Do",
            TodosStatus::ActiveTodos => "In progress",
            TodosStatus::CompletedTodos => "Done",
        }
    }

    /// Local-storage key mirroring this column
    pub fn storage_key(&self) -> &'static str {
        match self {
            TodosStatus::BacklogTodos => "backlogTodos",
            TodosStatus::ActiveTodos => "activeTodos",
            TodosStatus::CompletedTodos => "completedTodos",
        }
    }
}

/// Board layouts. Only Kanban renders anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TodosView {
    #[default]
    KanbanView,
    WeeklyView,
}

impl TodosView {
    pub const ALL: [TodosView; 2] = [TodosView::KanbanView, TodosView::WeeklyView];

    pub fn label(&self) -> &'static str {
        match self {
            TodosView::KanbanView => "Kanban",
            TodosView::WeeklyView => "Weekly",
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(alias = "todoname")]
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
}

impl Todo {
    /// New backlog item, not done
    pub fn new(id: TodoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: Status::Backlog,
            is_done: false,
        }
    }

    /// Same item with stage and done flag matching `zone`
    pub fn placed_in(mut self, zone: TodosStatus) -> Self {
        self.status = zone.status();
        self.is_done = zone == TodosStatus::CompletedTodos;
        self
    }
}
