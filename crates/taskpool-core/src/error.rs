// Error types for the core domain

use thiserror::Error;
use uuid::Uuid;

use crate::task::TaskStatus;

/// Errors raised by the task entity itself
#[derive(Debug, Error)]
pub enum TaskError {
    /// A status transition out of a terminal state was attempted.
    /// Transitions are one-way: pending -> completed or pending -> failed.
    #[error("invalid status transition from {from}")]
    InvalidTransition { from: TaskStatus },
}

/// Errors raised by task store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No task exists with the given id
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// The storage backend failed (connection lost, constraint violation, ...)
    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Wrap a backend error
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        StoreError::Backend(err.into())
    }
}
