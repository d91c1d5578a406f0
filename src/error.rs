//! Error Types
//!
//! Failures of the storage mirror, the remote collection and startup config.

use thiserror::Error;

/// Common result type for board operations
pub type TodoResult<T> = Result<T, TodoError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TodoError {
    #[error("remote store error: {0}")]
    Remote(String),
    #[error("local storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::Serialization(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for TodoError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        TodoError::Serialization(e.to_string())
    }
}
