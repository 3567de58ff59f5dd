// Task service: the producer path (persist, then enqueue) and the read path
//
// Reads never touch the queue. A task is only handed to the queue after it
// has been durably created, so there are no in-memory-only tasks.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use taskpool_core::{NewTask, StoreError, Task, TaskQueue, TaskStore};

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// The queue has been closed; the service no longer accepts work
    #[error("service is shutting down")]
    ShuttingDown,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    queue: TaskQueue,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, queue: TaskQueue) -> Self {
        Self { store, queue }
    }

    /// Create a pending task and hand it to the queue.
    ///
    /// The enqueue applies back-pressure: when the queue is at capacity the
    /// caller waits for a worker to free space. After shutdown has closed
    /// the queue the task stays persisted as pending but is not scheduled,
    /// and the caller gets [`TaskServiceError::ShuttingDown`].
    pub async fn create(&self, input: NewTask) -> Result<Task, TaskServiceError> {
        let task = self.store.create(input).await?;

        if self.queue.enqueue(task.clone()).await.is_err() {
            warn!(task_id = %task.id, "queue closed, task persisted but not scheduled");
            return Err(TaskServiceError::ShuttingDown);
        }

        Ok(task)
    }

    /// Fetch a single task; store queries only
    pub async fn get(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// List all tasks, newest first
    pub async fn list(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.store.find_all().await?)
    }
}
