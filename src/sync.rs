//! Remote Write Intents
//!
//! Every board edit is applied locally first and described by a
//! `WriteIntent`. The intent is sent to the repository with retries; if it
//! still fails it is rolled back on whatever the board looks like by then.

use std::fmt;
use std::future::Future;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Location, Placement};
use crate::error::TodoError;
use crate::models::{Todo, TodoId};
use crate::repository::TodoRepository;

/// Retry schedule for remote writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl SyncPolicy {
    /// Wait after failed attempt number `attempt` (1-based): doubles each time, capped
    pub fn backoff_after(&self, attempt: u32) -> u32 {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }
}

/// A local edit waiting to be persisted remotely
#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    Add { todo: Todo, position: u32, placements: Vec<Placement> },
    Rename { id: TodoId, previous: String, name: String },
    Delete { todo: Todo, location: Location, placements: Vec<Placement> },
    Move { id: TodoId, from: Location, placements: Vec<Placement> },
}

impl WriteIntent {
    /// Short description for messages
    pub fn describe(&self) -> String {
        match self {
            WriteIntent::Add { todo, .. } => format!("new todo \"{}\"", todo.name),
            WriteIntent::Rename { name, .. } => format!("rename to \"{}\"", name),
            WriteIntent::Delete { todo, .. } => format!("deletion of \"{}\"", todo.name),
            WriteIntent::Move { id, .. } => format!("move of todo {}", id),
        }
    }

    pub async fn send(&self, repo: &dyn TodoRepository) -> Result<(), TodoError> {
        match self {
            WriteIntent::Add { todo, position, placements } => {
                repo.add(todo, *position).await?;
                renumber(repo, placements).await
            }
            WriteIntent::Rename { id, name, .. } => repo.rename(id, name).await,
            WriteIntent::Delete { todo, placements, .. } => {
                repo.delete(&todo.id).await?;
                renumber(repo, placements).await
            }
            WriteIntent::Move { placements, .. } => repo.save_placements(placements).await,
        }
    }

    /// Undo this edit on `board`. `None` when there is nothing left to undo,
    /// e.g. the item was deleted or renamed again in the meantime.
    pub fn rollback(&self, board: &Board) -> Option<Board> {
        match self {
            WriteIntent::Add { todo, .. } => board.remove(&todo.id).map(|(next, _, _)| next),
            WriteIntent::Rename { id, previous, name } => {
                if board.get(id)?.name != *name {
                    return None;
                }
                board.rename(id, previous)
            }
            WriteIntent::Delete { todo, location, .. } => {
                if board.locate(&todo.id).is_some() {
                    return None;
                }
                Some(board.insert_at(todo.clone(), *location))
            }
            WriteIntent::Move { id, from, .. } => {
                let current = board.locate(id)?;
                board.move_todo(current, *from)
            }
        }
    }
}

/// Rewrite the positions of a column after an item entered or left it
async fn renumber(repo: &dyn TodoRepository, placements: &[Placement]) -> Result<(), TodoError> {
    if placements.is_empty() {
        return Ok(());
    }
    repo.save_placements(placements).await
}

/// An intent that exhausted its attempts
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFailure {
    pub intent: WriteIntent,
    pub error: TodoError,
    pub attempts: u32,
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not save {} after {} attempt(s): {}. The change was reverted.",
            self.intent.describe(),
            self.attempts,
            self.error
        )
    }
}

/// Send `intent`, retrying per `policy`. `sleep` waits the given milliseconds.
///
/// Returns the number of attempts used on success.
pub async fn dispatch<F, Fut>(
    repo: &dyn TodoRepository,
    intent: &WriteIntent,
    policy: &SyncPolicy,
    mut sleep: F,
) -> Result<u32, SyncFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match intent.send(repo).await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt < max_attempts => {
                let delay = policy.backoff_after(attempt);
                warn!(
                    "[SYNC] {} failed (attempt {}/{}): {}; retrying in {} ms",
                    intent.describe(),
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("[SYNC] Giving up on {}: {}", intent.describe(), e);
                return Err(SyncFailure {
                    intent: intent.clone(),
                    error: e,
                    attempts: attempt,
                });
            }
        }
    }
}
