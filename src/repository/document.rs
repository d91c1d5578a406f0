//! Remote document layout
//!
//! Fields stored per document in the `todos` collection. The document key
//! is the item id, so it is not repeated in the fields.

use serde::{Deserialize, Serialize};

use crate::board::Placement;
use crate::models::{Status, Todo, TodoId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(alias = "todoname")]
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl TodoDocument {
    pub fn from_todo(todo: &Todo, position: u32) -> Self {
        Self {
            name: todo.name.clone(),
            status: todo.status,
            is_done: todo.is_done,
            position: Some(position),
        }
    }

    pub fn into_todo(self, id: TodoId) -> (Todo, Option<u32>) {
        let todo = Todo {
            id,
            name: self.name,
            status: self.status,
            is_done: self.is_done,
        };
        (todo, self.position)
    }

    pub fn apply_placement(&mut self, placement: &Placement) {
        self.status = placement.status;
        self.position = Some(placement.position);
        self.is_done = placement.is_done;
    }
}
