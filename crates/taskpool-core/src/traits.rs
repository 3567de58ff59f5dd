// Contracts implemented outside the core
//
// TaskStore is the durable persistence collaborator; TaskExecutor is the
// injected unit of work a worker runs per task. Both are async traits so
// implementations can hit the network or sleep.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::StoreError;
use crate::task::{NewTask, Task};

/// Durable task persistence.
///
/// Each call is a self-contained unit of work; implementations serialize
/// their own access and must be safe for concurrent use across workers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create and persist a pending task. The store assigns the identity;
    /// it is stable once assigned. On error the task must not exist
    /// anywhere (the producer never enqueues a task that failed to persist).
    async fn create(&self, input: NewTask) -> Result<Task, StoreError>;

    /// Look up a task by id. `Ok(None)` when no such task exists.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// List all tasks, newest first.
    async fn find_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Persist the mutable fields (status, updated_at) of an existing task.
    /// Identity fields are immutable post-creation.
    async fn update(&self, task: &Task) -> Result<(), StoreError>;
}

/// Failure of a task's unit of work. Local to one worker iteration; the
/// pool maps it to a terminal `failed` status and keeps running.
#[derive(Debug, Error)]
#[error("task execution failed: {0}")]
pub struct ExecutionError(pub String);

impl ExecutionError {
    pub fn new(msg: impl Into<String>) -> Self {
        ExecutionError(msg.into())
    }
}

/// The replaceable per-task unit of work run by a worker.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &Task) -> Result<(), ExecutionError>;
}
